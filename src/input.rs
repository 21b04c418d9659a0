use glam::Vec2;
use web_sys as web;

/// Tells a click from a drag: a release farther than `threshold` pixels from
/// the press, at any point during the gesture, marks it as a drag.
#[derive(Clone, Copy, Debug)]
pub struct DragDetector {
    threshold: f32,
    down_at: Option<Vec2>,
    last: Vec2,
    dragged: bool,
}

impl DragDetector {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            down_at: None,
            last: Vec2::ZERO,
            dragged: false,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.down_at.is_some()
    }

    pub fn press(&mut self, pos: Vec2) {
        self.down_at = Some(pos);
        self.last = pos;
        self.dragged = false;
    }

    /// Movement since the previous sample while pressed; zero otherwise.
    pub fn track(&mut self, pos: Vec2) -> Vec2 {
        let Some(down) = self.down_at else {
            return Vec2::ZERO;
        };
        if pos.distance(down) > self.threshold {
            self.dragged = true;
        }
        let delta = pos - self.last;
        self.last = pos;
        delta
    }

    /// End the gesture; returns whether it was a drag. A release without a
    /// press counts as a drag so it never selects.
    pub fn release(&mut self, pos: Vec2) -> bool {
        let Some(down) = self.down_at.take() else {
            return true;
        };
        let was_drag = self.dragged || pos.distance(down) > self.threshold;
        self.dragged = false;
        was_drag
    }
}

// ---------------- Pointer helpers ----------------
#[inline]
pub fn pointer_canvas_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    let w = (rect.width() as f32).max(1.0);
    let h = (rect.height() as f32).max(1.0);
    Vec2::new(
        x_css / w * canvas.width() as f32,
        y_css / h * canvas.height() as f32,
    )
}
