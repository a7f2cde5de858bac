use std::sync::Arc;

use druid::piet::InterpolationMode;
use druid::widget::{Controller, Flex, Label, Painter};
use druid::{
    AppLauncher, Color, Data, Env, Event, EventCtx, FontDescriptor, FontFamily, FontWeight,
    ImageBuf, PaintCtx, PlatformError, RenderContext, Size, Widget, WidgetExt, WindowDesc,
};

use crate::coord::Frame;
use crate::figure::Figure;
use crate::gui::convert_image;

const MAX_VIEW: f64 = 800.0;
const PADDING: f64 = 10.0;
const READOUT_H: f64 = 40.0;

#[derive(Clone, Data)]
struct ViewerState {
    image: Arc<ImageBuf>,
    extent: Frame<f64>,
    cursor: Option<(f64, f64)>,
}

/// Largest size with the image's aspect ratio that fits a `MAX_VIEW` square.
fn view_size(width: u32, height: u32) -> Size {
    let scale = (MAX_VIEW / width as f64).min(MAX_VIEW / height as f64);
    Size::new(width as f64 * scale, height as f64 * scale)
}

fn build_image() -> Painter<ViewerState> {
    Painter::new(|ctx: &mut PaintCtx, data: &ViewerState, _env: &Env| {
        let rect = ctx.size().to_rect();
        let image = data.image.to_image(ctx.render_ctx);
        ctx.draw_image(&image, rect, InterpolationMode::NearestNeighbor);
    })
}

/// Tracks the data coordinate under the pointer.
struct CursorReadout;

impl<W> Controller<ViewerState, W> for CursorReadout
where
    W: Widget<ViewerState>,
{
    fn event(
        &mut self,
        child: &mut W,
        ctx: &mut EventCtx,
        event: &Event,
        data: &mut ViewerState,
        env: &Env,
    ) {
        if let Event::MouseMove(mouse) = event {
            let Size { width, height } = ctx.size();
            if width > 0.0 && height > 0.0 {
                let fx = (mouse.pos.x / width).clamp(0.0, 1.0);
                let fy = (mouse.pos.y / height).clamp(0.0, 1.0);
                data.cursor = Some(data.extent.point_at(fx, fy));
            }
        }
        child.event(ctx, event, data, env)
    }
}

fn build_readout() -> Label<ViewerState> {
    Label::new(|data: &ViewerState, _: &Env| match data.cursor {
        Some((x, y)) => format!("X {:+1.16}   Y {:+1.16}", x, y),
        None => format!("extent {}", data.extent),
    })
    .with_text_color(Color::rgb8(0x88, 0x88, 0x88))
    .with_font(
        FontDescriptor::new(FontFamily::MONOSPACE)
            .with_size(11.0)
            .with_weight(FontWeight::SEMI_BOLD),
    )
}

/// Opens a window showing the figure and blocks until it is closed.
pub fn show(figure: &Figure) -> Result<(), PlatformError> {
    let size = view_size(figure.width(), figure.height());
    let state = ViewerState {
        image: Arc::new(convert_image(&figure.image)),
        extent: figure.extent.clone(),
        cursor: None,
    };

    let ui = Flex::column()
        .with_child(
            build_image()
                .fix_size(size.width, size.height)
                .controller(CursorReadout),
        )
        .with_child(build_readout().padding(PADDING))
        .padding(PADDING)
        .background(Color::rgb8(0x10, 0x10, 0x10));

    AppLauncher::with_window(
        WindowDesc::new(ui)
            .title(figure.title.clone())
            .window_size((
                size.width + 2.0 * PADDING,
                size.height + 2.0 * PADDING + READOUT_H,
            ))
            .resizable(false),
    )
    .launch(state)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_view_size_square() {
        assert_eq!(view_size(2000, 2000), Size::new(800.0, 800.0));
        assert_eq!(view_size(10, 10), Size::new(800.0, 800.0));
    }

    #[test]
    fn test_view_size_wide() {
        assert_eq!(view_size(4000, 2000), Size::new(800.0, 400.0));
    }
}
