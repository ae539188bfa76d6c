use crate::models::VocabularyItem;
use std::f64::consts::PI;

pub const RADIUS: f64 = 140.0;
pub const CENTER: f64 = 160.0;
pub const LABEL_INSET: f64 = 40.0;
pub const FALLBACK_COLOR: &str = "#888888";

/// One pie slice of the emotion wheel, in SVG user units.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelSlice {
    pub label: String,
    pub color: String,
    pub path: String,
    pub label_x: f64,
    pub label_y: f64,
}

pub fn slices(emotions: &[VocabularyItem]) -> Vec<WheelSlice> {
    if emotions.is_empty() {
        return Vec::new();
    }

    let angle = 2.0 * PI / emotions.len() as f64;
    let large_arc = u8::from(angle > PI);

    emotions
        .iter()
        .enumerate()
        .map(|(index, emotion)| {
            let start = angle * index as f64;
            let end = start + angle;
            let (x1, y1) = point(RADIUS, start);
            let (x2, y2) = point(RADIUS, end);
            let (label_x, label_y) = point(RADIUS - LABEL_INSET, start + angle / 2.0);

            let path = if emotions.len() == 1 {
                // A full-circle arc degenerates when start and end coincide.
                format!(
                    "M {x1:.2} {y1:.2} A {RADIUS} {RADIUS} 0 1 1 {mx:.2} {my:.2} A {RADIUS} {RADIUS} 0 1 1 {x1:.2} {y1:.2} Z",
                    mx = CENTER * 2.0 - x1,
                    my = CENTER * 2.0 - y1,
                )
            } else {
                format!(
                    "M {CENTER} {CENTER} L {x1:.2} {y1:.2} A {RADIUS} {RADIUS} 0 {large_arc} 1 {x2:.2} {y2:.2} Z"
                )
            };

            WheelSlice {
                label: emotion.name.clone(),
                color: emotion
                    .color
                    .clone()
                    .unwrap_or_else(|| FALLBACK_COLOR.to_string()),
                path,
                label_x,
                label_y,
            }
        })
        .collect()
}

fn point(radius: f64, angle: f64) -> (f64, f64) {
    (CENTER + radius * angle.cos(), CENTER + radius * angle.sin())
}
