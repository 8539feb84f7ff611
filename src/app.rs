use crate::session::Session;
use crate::surface::{ToolConfig, ToolKind};
use crate::typeset::EguiTypesetter;
use egui::{Color32, Pos2, Rect, Sense, Slider, Stroke, TextureHandle, TextureOptions};
use std::time::Instant;

/// Brush palette, matching the tool's original swatch row.
const SWATCHES: [Color32; 11] = [
    Color32::from_rgb(0x00, 0x00, 0x00),
    Color32::from_rgb(0xee, 0x33, 0x33),
    Color32::from_rgb(0xe6, 0x49, 0x80),
    Color32::from_rgb(0xbe, 0x4b, 0xdb),
    Color32::from_rgb(0x89, 0x32, 0x00),
    Color32::from_rgb(0x22, 0x8b, 0xe6),
    Color32::from_rgb(0x33, 0x33, 0xee),
    Color32::from_rgb(0x40, 0xc0, 0x57),
    Color32::from_rgb(0x00, 0xaa, 0x00),
    Color32::from_rgb(0xfa, 0xb0, 0x05),
    Color32::from_rgb(0xfd, 0x7e, 0x14),
];

const CANVAS_BACKDROP: Color32 = Color32::from_gray(245);

pub struct CalcApp {
    session: Session,
    tool: ToolConfig,
    typesetter: EguiTypesetter,
    canvas_texture: Option<TextureHandle>,
    raster_dirty: bool,
}

impl CalcApp {
    /// Called once before the first frame.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            // Sized properly on the first frame's resize check.
            session: Session::new(1, 1),
            tool: ToolConfig::default(),
            typesetter: EguiTypesetter::new(),
            canvas_texture: None,
            raster_dirty: true,
        }
    }

    /// Maps pointer state on the canvas to the stroke controller.
    fn handle_canvas_input(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let to_canvas = |pos: Pos2| -> Pos2 { pos - response.rect.min.to_vec2() };

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.session.begin_stroke(to_canvas(pos), self.tool);
                self.raster_dirty = true;
            }
        } else if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.session.extend_stroke(to_canvas(pos));
                self.raster_dirty = true;
            }
        }
        if response.drag_stopped() {
            self.session.end_stroke();
        }
        // Pointer left the window entirely: treat as pointer-up.
        if self.session.stroke_active() && ctx.input(|i| i.pointer.latest_pos().is_none()) {
            self.session.end_stroke();
        }
    }

    fn tools_window(&mut self, ctx: &egui::Context) {
        egui::Window::new("Tools")
            .fixed_pos(egui::pos2(20.0, 20.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui
                        .selectable_label(self.tool.kind == ToolKind::Brush, "🖌 Brush")
                        .clicked()
                    {
                        self.tool.kind = ToolKind::Brush;
                    }
                    if ui
                        .selectable_label(self.tool.kind == ToolKind::Eraser, "⌫ Eraser")
                        .clicked()
                    {
                        self.tool.kind = ToolKind::Eraser;
                    }
                });

                ui.separator();

                ui.horizontal(|ui| {
                    for &swatch in &SWATCHES {
                        let (rect, response) =
                            ui.allocate_exact_size(egui::vec2(20.0, 20.0), Sense::click());
                        ui.painter().rect_filled(rect, 3.0, swatch);
                        if self.tool.kind == ToolKind::Brush && self.tool.color == swatch {
                            ui.painter().rect_stroke(
                                rect,
                                3.0,
                                Stroke::new(2.0, ui.visuals().selection.stroke.color),
                            );
                        }
                        if response.clicked() {
                            self.tool.kind = ToolKind::Brush;
                            self.tool.color = swatch;
                        }
                    }
                });

                ui.horizontal(|ui| {
                    ui.label("Stroke width:");
                    ui.add(Slider::new(&mut self.tool.stroke_width, 1.0..=50.0));
                });

                ui.separator();

                ui.horizontal(|ui| {
                    if ui.button("Run").clicked() {
                        let repaint_ctx = ctx.clone();
                        self.session.run(move || repaint_ctx.request_repaint());
                    }
                    if ui.button("Reset").clicked() {
                        self.session.reset(&mut self.typesetter);
                        self.raster_dirty = true;
                    }
                    if self.session.is_recognizing() {
                        ui.spinner();
                        ui.label("Recognizing…");
                    }
                });
            });
    }
}

impl eframe::App for CalcApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // Absorb completed recognition rounds and advance due reveals
        // before drawing this frame.
        self.session.pump(now, &mut self.typesetter);

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                // Keep the raster matched to the viewport; resizing clears.
                let size = ui.available_size();
                let (width, height) = (size.x.max(1.0) as u32, size.y.max(1.0) as u32);
                if width != self.session.surface().width()
                    || height != self.session.surface().height()
                {
                    self.session.resize(width, height);
                    self.raster_dirty = true;
                }

                let (response, painter) = ui.allocate_painter(size, Sense::drag());
                let rect = response.rect;
                painter.rect_filled(rect, 0.0, CANVAS_BACKDROP);

                self.handle_canvas_input(ctx, &response);

                if self.raster_dirty || self.canvas_texture.is_none() {
                    let color_image = self.session.surface().to_color_image();
                    match &mut self.canvas_texture {
                        Some(texture) => texture.set(color_image, TextureOptions::NEAREST),
                        None => {
                            self.canvas_texture = Some(ctx.load_texture(
                                "canvas",
                                color_image,
                                TextureOptions::NEAREST,
                            ));
                        }
                    }
                    self.raster_dirty = false;
                }

                if let Some(texture) = &self.canvas_texture {
                    let image_rect = Rect::from_min_size(
                        rect.min,
                        egui::vec2(
                            self.session.surface().width() as f32,
                            self.session.surface().height() as f32,
                        ),
                    );
                    painter.image(
                        texture.id(),
                        image_rect,
                        Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                        Color32::WHITE,
                    );
                }

                self.typesetter.paint(&painter, rect.min.to_vec2());
            });

        self.tools_window(ctx);

        // Wake up again when the next reveal falls due.
        if let Some(due) = self.session.overlay().next_due() {
            ctx.request_repaint_after(due.saturating_duration_since(now));
        }
    }
}
