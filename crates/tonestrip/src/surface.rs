//! Control-surface capability types.
//!
//! No drawing happens here. These types carry the non-visual behavior of an
//! editor: which colours the selected theme uses, how a slider position maps
//! onto a parameter, who gets told when a control moves, and where the meter
//! readings come from. A GUI toolkit renders on top of them.

use tonestrip_core::{EngineResult, ParameterValue};

use crate::control::ControlHandle;
use crate::params::{CUTOFF, VOLUME};

/// Initial editor size.
pub const EDITOR_SIZE: Size = Size::new(400, 300);

/// Height of the title bar in pixels.
pub const TITLE_BAR_HEIGHT: u32 = 40;

/// 2D size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Build from `0xRRGGBB`.
    pub const fn from_hex(hex: u32) -> Self {
        Self((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Pack as `0xRRGGBB`.
    pub const fn to_hex(self) -> u32 {
        ((self.0 as u32) << 16) | ((self.1 as u32) << 8) | self.2 as u32
    }
}

/// Colours a surface is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleTable {
    pub background: Rgb,
    pub title_bar: Rgb,
    pub title_text: Rgb,
    pub label_text: Rgb,
}

const TITLE_BAR: Rgb = Rgb::from_hex(0x8a2be2);
const WHITE: Rgb = Rgb::from_hex(0xffffff);
const BLACK: Rgb = Rgb::from_hex(0x000000);

/// Selectable colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Midnight,
    Grey,
    Light,
}

impl Theme {
    /// Every theme in menu order.
    pub const ALL: [Theme; 4] = [Theme::Dark, Theme::Midnight, Theme::Grey, Theme::Light];

    /// Menu label.
    pub const fn label(self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Midnight => "Midnight",
            Theme::Grey => "Grey",
            Theme::Light => "Light",
        }
    }

    /// Colours for this theme.
    pub const fn style(self) -> StyleTable {
        let (background, label_text) = match self {
            Theme::Dark => (Rgb::from_hex(0x323e44), WHITE),
            Theme::Midnight => (Rgb::from_hex(0x2f2f3a), WHITE),
            Theme::Grey => (Rgb::from_hex(0x505050), WHITE),
            Theme::Light => (Rgb::from_hex(0xefefef), BLACK),
        };
        StyleTable {
            background,
            title_bar: TITLE_BAR,
            title_text: WHITE,
            label_text,
        }
    }
}

/// Something that wants to hear about control movements.
pub trait ControlListener: Send {
    /// A control moved; `value` is the new plain value.
    fn control_changed(&mut self, key: &str, value: ParameterValue);
}

/// Binds one slider to one parameter.
pub struct SliderAttachment {
    key: &'static str,
    label: &'static str,
    control: ControlHandle,
    listener: Option<Box<dyn ControlListener>>,
}

impl SliderAttachment {
    /// Attach to the parameter `key`. The label is the parameter's name.
    pub fn new(control: ControlHandle, key: &'static str) -> Self {
        let label = control
            .parameters()
            .find(|info| info.key == key)
            .map_or(key, |info| info.name);
        Self {
            key,
            label,
            control,
            listener: None,
        }
    }

    /// Notify `listener` whenever the slider moves.
    pub fn with_listener(mut self, listener: Box<dyn ControlListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Parameter key.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Label shown above the slider.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// The slider moved to `normalized` (0..=1).
    pub fn set_from_slider(&mut self, normalized: f64) -> EngineResult<()> {
        self.control.set_parameter_normalized(self.key, normalized)?;
        let value = self.control.get_parameter(self.key)?;
        if let Some(listener) = self.listener.as_mut() {
            listener.control_changed(self.key, value);
        }
        Ok(())
    }

    /// Value typed into the slider's text box.
    pub fn set_from_text(&mut self, text: &str) -> EngineResult<()> {
        self.control.set_parameter_text(self.key, text)?;
        let value = self.control.get_parameter(self.key)?;
        if let Some(listener) = self.listener.as_mut() {
            listener.control_changed(self.key, value);
        }
        Ok(())
    }

    /// Where the slider should be drawn.
    pub fn slider_position(&self) -> EngineResult<f64> {
        self.control.get_parameter_normalized(self.key)
    }

    /// Text under the slider.
    pub fn text(&self) -> EngineResult<String> {
        self.control.get_parameter_text(self.key)
    }
}

impl std::fmt::Debug for SliderAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SliderAttachment")
            .field("key", &self.key)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

/// Editor state: theme, slider bindings and meter readback.
#[derive(Debug)]
pub struct Surface {
    title: &'static str,
    theme: Theme,
    size: Size,
    volume: SliderAttachment,
    cutoff: SliderAttachment,
    control: ControlHandle,
}

impl Surface {
    /// Create a surface bound to `control`, using the dark theme.
    pub fn new(control: ControlHandle, title: &'static str) -> Self {
        Self {
            title,
            theme: Theme::default(),
            size: EDITOR_SIZE,
            volume: SliderAttachment::new(control.clone(), VOLUME),
            cutoff: SliderAttachment::new(control.clone(), CUTOFF),
            control,
        }
    }

    /// Title drawn in the title bar.
    pub fn title(&self) -> &'static str {
        self.title
    }

    /// Editor size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Current theme.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Switch theme. Only this surface is affected.
    pub fn set_theme(&mut self, theme: Theme) {
        log::debug!("surface theme: {}", theme.label());
        self.theme = theme;
    }

    /// Colours of the current theme.
    pub fn style(&self) -> StyleTable {
        self.theme.style()
    }

    /// Volume slider.
    pub fn volume(&mut self) -> &mut SliderAttachment {
        &mut self.volume
    }

    /// Low-pass slider.
    pub fn cutoff(&mut self) -> &mut SliderAttachment {
        &mut self.cutoff
    }

    /// Slider bound to `key`.
    pub fn attachment(&mut self, key: &str) -> Option<&mut SliderAttachment> {
        [&mut self.volume, &mut self.cutoff]
            .into_iter()
            .find(|attachment| attachment.key == key)
    }

    /// `(block peak, session peak)` for the meter.
    pub fn meter_levels(&self) -> (f32, f32) {
        (self.control.block_peak(), self.control.session_peak())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use std::sync::{Arc, Mutex};

    struct Recorder(Arc<Mutex<Vec<(String, f64)>>>);

    impl ControlListener for Recorder {
        fn control_changed(&mut self, key: &str, value: ParameterValue) {
            self.0.lock().unwrap().push((key.to_string(), value));
        }
    }

    #[test]
    fn test_theme_styles() {
        assert_eq!(Theme::default(), Theme::Dark);
        assert_eq!(Theme::Dark.style().background.to_hex(), 0x323e44);
        assert_eq!(Theme::Light.style().label_text, Rgb(0, 0, 0));
        for theme in Theme::ALL {
            assert_eq!(theme.style().title_bar, Rgb(138, 43, 226));
        }
        let labels: Vec<_> = Theme::ALL.iter().map(|t| t.label()).collect();
        assert_eq!(labels, vec!["Dark", "Midnight", "Grey", "Light"]);
    }

    #[test]
    fn test_slider_writes_parameter_and_notifies() {
        let engine = Engine::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut slider = SliderAttachment::new(engine.controller(), VOLUME)
            .with_listener(Box::new(Recorder(events.clone())));

        assert_eq!(slider.label(), "Volume");
        slider.set_from_slider(0.75).unwrap();
        assert_eq!(engine.controller().get_parameter(VOLUME), Ok(20.0));
        assert_eq!(slider.slider_position(), Ok(0.75));
        assert_eq!(slider.text().unwrap(), "20.0000");

        slider.set_from_text("-10").unwrap();
        assert_eq!(
            *events.lock().unwrap(),
            vec![("VOL".to_string(), 20.0), ("VOL".to_string(), -10.0)]
        );
    }

    #[test]
    fn test_surface_owns_its_theme() {
        let engine = Engine::new();
        let mut a = Surface::new(engine.controller(), "DSP Lesson 1");
        let b = Surface::new(engine.controller(), "DSP Lesson 1");
        a.set_theme(Theme::Midnight);
        assert_eq!(a.theme(), Theme::Midnight);
        assert_eq!(b.theme(), Theme::Dark);
        assert_eq!(a.size(), Size::new(400, 300));
        assert_eq!(a.style().background, Rgb::from_hex(0x2f2f3a));
    }

    #[test]
    fn test_surface_attachments_and_meters() {
        let engine = Engine::new();
        let mut surface = Surface::new(engine.controller(), "Tonestrip");
        assert_eq!(surface.cutoff().label(), "Low-Pass");
        surface.attachment(CUTOFF).unwrap().set_from_slider(0.0).unwrap();
        assert_eq!(engine.controller().get_parameter(CUTOFF), Ok(20.0));
        assert!(surface.attachment("Q").is_none());
        assert_eq!(surface.meter_levels(), (0.0, 0.0));
    }
}
