use crate::snapshot::render_snapshot;
use eframe::egui;
use proto3d_core::obj::read_obj;
use proto3d_core::project::{project, to_viewport, Camera};
use proto3d_core::Mesh;
use std::path::{Path, PathBuf};

const SNAPSHOT_SIZE: u32 = 1024;

pub struct ModelApp {
    model_path: Option<PathBuf>,
    mesh: Option<Mesh>,

    camera: Camera,
    initial_camera: Camera,

    status: String,
}

impl ModelApp {
    pub fn new(mesh: Option<Mesh>, model_path: Option<PathBuf>, camera: Camera) -> Self {
        let status = match (&mesh, &model_path) {
            (Some(m), Some(p)) => describe(p, m),
            (Some(m), None) => format!("{} vertices, {} faces", m.vertex_count(), m.face_count()),
            _ => "Open an OBJ model to begin.".to_string(),
        };
        Self {
            model_path,
            mesh,
            camera,
            initial_camera: camera,
            status,
        }
    }

    fn pick_model(&mut self) {
        let file = rfd::FileDialog::new()
            .add_filter("Wavefront OBJ", &["obj"])
            .pick_file();
        if let Some(path) = file {
            self.load_model(&path);
        }
    }

    fn load_model(&mut self, path: &Path) {
        match read_obj(path) {
            Ok(mesh) => {
                self.status = describe(path, &mesh);
                self.mesh = Some(mesh);
                self.model_path = Some(path.to_path_buf());
                self.camera = self.initial_camera;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to load model");
                self.status = format!("Failed to load {}: {e}", path.display());
            }
        }
    }

    fn save_snapshot(&mut self) {
        let Some(mesh) = &self.mesh else {
            self.status = "No model loaded.".to_string();
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG image", &["png"])
            .set_file_name("snapshot.png")
            .save_file()
        else {
            return;
        };
        self.status = match render_snapshot(mesh, SNAPSHOT_SIZE, SNAPSHOT_SIZE, &path) {
            Ok(()) => format!("Wrote snapshot: {}", path.display()),
            Err(e) => format!("Failed to write snapshot: {e}"),
        };
    }

    fn handle_file_drop(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().find(|f| f.path.is_some()) else {
            return;
        };
        if let Some(path) = file.path {
            self.load_model(&path);
        }
    }
}

fn describe(path: &Path, mesh: &Mesh) -> String {
    format!(
        "{}: {} vertices, {} faces",
        path.display(),
        mesh.vertex_count(),
        mesh.face_count()
    )
}

impl eframe::App for ModelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_file_drop(ctx);

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open model…").clicked() {
                    self.pick_model();
                }
                if ui
                    .add_enabled(self.mesh.is_some(), egui::Button::new("Save snapshot…"))
                    .clicked()
                {
                    self.save_snapshot();
                }
                if ui.button("Reset view").clicked() {
                    self.camera = self.initial_camera;
                }
                ui.separator();
                ui.label(format!(
                    "azimuth {:.0}°  elevation {:.0}°  zoom {:.2}",
                    self.camera.azimuth_deg, self.camera.elevation_deg, self.camera.zoom
                ));
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status);
                if let Some(p) = &self.model_path {
                    if ui.button("Copy path").clicked() {
                        ui.ctx().copy_text(p.display().to_string());
                    }
                    if let Some(dir) = p.parent() {
                        if ui.button("Open folder").clicked() {
                            let _ = open::that(dir);
                        }
                    }
                }
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(egui::Color32::WHITE))
            .show(ctx, |ui| draw_model(ui, self));
    }
}

fn draw_model(ui: &mut egui::Ui, app: &mut ModelApp) {
    let Some(mesh) = &app.mesh else {
        ui.label("No model loaded.");
        return;
    };

    let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::drag());
    let painter = ui.painter_at(rect);

    if response.dragged() {
        let d = response.drag_delta();
        app.camera.orbit(-d.x as f64 * 0.5, d.y as f64 * 0.5);
    }
    if response.hovered() {
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll.abs() > 0.0 {
            let factor = (scroll as f64 / 200.0).exp();
            app.camera.zoom = (app.camera.zoom * factor).clamp(0.1, 30.0);
        }
    }

    let (w, h) = (rect.width() as f64, rect.height() as f64);
    let mut shape = egui::Mesh::default();
    for tri in project(mesh, &app.camera) {
        let base = shape.vertices.len() as u32;
        let color = egui::Color32::from_rgb(tri.color[0], tri.color[1], tri.color[2]);
        for p in tri.points {
            let [x, y] = to_viewport(p, w, h);
            shape.colored_vertex(rect.min + egui::vec2(x as f32, y as f32), color);
        }
        shape.add_triangle(base, base + 1, base + 2);
    }
    painter.add(egui::Shape::mesh(shape));
}
