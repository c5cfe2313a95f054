use serde::{Deserialize, Serialize};

/// How the render canvas is sized relative to its window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum CanvasConfig {
    /// Fill the window.
    #[default]
    Resizable,
    /// Fixed resolution in physical pixels.
    Fixed { width: u32, height: u32 },
    /// Largest area of the given aspect ratio that fits the window.
    Proportional { aspect: f32 },
}

impl CanvasConfig {
    /// Viewport size for a window of `width` x `height` pixels.
    pub fn viewport(&self, width: u32, height: u32) -> (u32, u32) {
        match *self {
            Self::Resizable => (width.max(1), height.max(1)),
            Self::Fixed { width, height } => (width.max(1), height.max(1)),
            Self::Proportional { aspect } if aspect > 0.0 => {
                let w = width.max(1) as f32;
                let h = height.max(1) as f32;
                if w / h > aspect {
                    (((h * aspect).round() as u32).max(1), h as u32)
                } else {
                    (w as u32, ((w / aspect).round() as u32).max(1))
                }
            }
            Self::Proportional { .. } => (width.max(1), height.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_modes() {
        let fixed: CanvasConfig =
            serde_json::from_str(r#"{"mode":"Fixed","width":800,"height":600}"#).unwrap();
        assert_eq!(
            fixed,
            CanvasConfig::Fixed {
                width: 800,
                height: 600
            }
        );
        let resizable: CanvasConfig = serde_json::from_str(r#"{"mode":"Resizable"}"#).unwrap();
        assert_eq!(resizable, CanvasConfig::Resizable);
    }

    #[test]
    fn proportional_letterboxes() {
        let c = CanvasConfig::Proportional { aspect: 2.0 };
        assert_eq!(c.viewport(1000, 1000), (1000, 500));
        assert_eq!(c.viewport(1000, 200), (400, 200));
    }

    #[test]
    fn resizable_never_zero() {
        assert_eq!(CanvasConfig::Resizable.viewport(0, 0), (1, 1));
    }
}
