use egui::{Color32, Pos2};
use inkcalc::{Session, StrokeController, Surface, ToolConfig, ToolKind};

fn brush(color: Color32, width: f32) -> ToolConfig {
    ToolConfig {
        kind: ToolKind::Brush,
        color,
        stroke_width: width,
    }
}

fn eraser(width: f32) -> ToolConfig {
    ToolConfig {
        kind: ToolKind::Eraser,
        color: Color32::BLACK,
        stroke_width: width,
    }
}

fn surface_is_blank(surface: &Surface) -> bool {
    surface.raster().pixels().all(|pixel| pixel[3] == 0)
}

#[test]
fn stroke_path_is_continuous() {
    let mut surface = Surface::new(200, 200);
    let mut controller = StrokeController::new();

    controller.begin_stroke(&mut surface, Pos2::new(10.0, 10.0), brush(Color32::BLACK, 4.0));
    controller.extend_stroke(&mut surface, Pos2::new(160.0, 90.0));
    controller.end_stroke();

    // Every sample along the segment must be covered, no gaps.
    for i in 0..=100 {
        let t = i as f32 / 100.0;
        let point = Pos2::new(10.0 + 150.0 * t, 10.0 + 80.0 * t);
        assert!(surface.has_ink_at(point), "gap in stroke at {point:?}");
    }
}

#[test]
fn stroke_keeps_the_tool_captured_at_begin() {
    let mut surface = Surface::new(120, 120);
    let mut controller = StrokeController::new();

    controller.begin_stroke(&mut surface, Pos2::new(20.0, 20.0), brush(Color32::RED, 6.0));
    // A second begin while a stroke is active is silently ignored, so the
    // blue tool must not leak into the path.
    controller.begin_stroke(&mut surface, Pos2::new(80.0, 80.0), brush(Color32::BLUE, 6.0));
    controller.extend_stroke(&mut surface, Pos2::new(60.0, 20.0));
    controller.end_stroke();

    let pixel = surface.raster().get_pixel(40, 20);
    assert_eq!(pixel.0, [255, 0, 0, 255]);
    // No dot where the ignored begin pointed.
    assert!(!surface.has_ink_at(Pos2::new(80.0, 80.0)));
}

#[test]
fn extend_without_begin_is_a_no_op() {
    let mut surface = Surface::new(64, 64);
    let mut controller = StrokeController::new();

    controller.extend_stroke(&mut surface, Pos2::new(30.0, 30.0));

    assert!(surface_is_blank(&surface));
    assert!(!controller.is_active());
}

#[test]
fn end_stroke_is_idempotent() {
    let mut surface = Surface::new(64, 64);
    let mut controller = StrokeController::new();

    controller.begin_stroke(&mut surface, Pos2::new(10.0, 10.0), brush(Color32::BLACK, 2.0));
    controller.end_stroke();
    controller.end_stroke();

    // The stroke is over; further extends add nothing.
    controller.extend_stroke(&mut surface, Pos2::new(50.0, 50.0));
    assert!(!surface.has_ink_at(Pos2::new(50.0, 50.0)));
}

#[test]
fn eraser_clears_ink_back_to_background() {
    let mut surface = Surface::new(120, 120);
    let mut controller = StrokeController::new();

    controller.begin_stroke(&mut surface, Pos2::new(20.0, 50.0), brush(Color32::BLACK, 6.0));
    controller.extend_stroke(&mut surface, Pos2::new(80.0, 50.0));
    controller.end_stroke();
    assert!(surface.has_ink_at(Pos2::new(50.0, 50.0)));

    controller.begin_stroke(&mut surface, Pos2::new(50.0, 20.0), eraser(8.0));
    controller.extend_stroke(&mut surface, Pos2::new(50.0, 80.0));
    controller.end_stroke();

    // The crossing is erased, the rest of the line survives.
    assert!(!surface.has_ink_at(Pos2::new(50.0, 50.0)));
    assert!(surface.has_ink_at(Pos2::new(25.0, 50.0)));
}

#[test]
fn resize_destroys_the_active_stroke_and_the_ink() {
    let mut session = Session::new(200, 200);

    session.begin_stroke(Pos2::new(30.0, 30.0), brush(Color32::BLACK, 5.0));
    session.extend_stroke(Pos2::new(90.0, 60.0));
    assert!(session.stroke_active());

    session.resize(300, 240);

    assert!(!session.stroke_active());
    assert_eq!(session.surface().width(), 300);
    assert_eq!(session.surface().height(), 240);
    assert!(surface_is_blank(session.surface()));
}
