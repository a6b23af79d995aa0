//! # TitleBar Component
//!
//! Top status bar showing the active module, its load status and the
//! latest status message.
//!
//! ## Conditional Formatting
//!
//! 1. **Busy**: `"EduMilestone | ⠹ Module01: Loading | Opening OCR..."`
//! 2. **Active module**: `"EduMilestone | Module01: Ready | OCR ready"`
//! 3. **Nothing loaded**: `"EduMilestone | Welcome to EduMilestone!"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::modules::LoadStatus;

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Top status bar component. All fields are props from the parent.
pub struct TitleBar {
    pub module_name: Option<String>,
    pub load_status: LoadStatus,
    pub status_message: String,
    /// `Some(frame)` while a request or transition is in flight.
    pub spinner_frame: Option<usize>,
}

impl TitleBar {
    pub fn new(
        module_name: Option<String>,
        load_status: LoadStatus,
        status_message: String,
        spinner_frame: Option<usize>,
    ) -> Self {
        Self {
            module_name,
            load_status,
            status_message,
            spinner_frame,
        }
    }

    fn status_style(&self) -> Style {
        match self.load_status {
            LoadStatus::Success => Style::default().fg(Color::Green),
            LoadStatus::Loading | LoadStatus::Unloading => Style::default().fg(Color::Yellow),
            s if s.is_failure() => Style::default().fg(Color::Red),
            _ => Style::default().fg(Color::DarkGray),
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw("EduMilestone")];

        let spinner = self
            .spinner_frame
            .map(|f| format!("{} ", SPINNER[f % SPINNER.len()]))
            .unwrap_or_default();
        if let Some(module) = &self.module_name {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                format!("{spinner}{module}: {}", self.load_status),
                self.status_style(),
            ));
        } else if !spinner.is_empty() {
            spans.push(Span::raw(" | "));
            spans.push(Span::raw(spinner.trim_end().to_string()));
        }

        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }

        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(mut title_bar: TitleBar) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_title_bar_with_active_module() {
        let text = rendered(TitleBar::new(
            Some("Module01".to_string()),
            LoadStatus::Success,
            "OCR ready".to_string(),
            None,
        ));
        assert!(text.contains("EduMilestone"));
        assert!(text.contains("Module01: Ready"));
        assert!(text.contains("OCR ready"));
    }

    #[test]
    fn test_title_bar_spinner_while_busy() {
        let text = rendered(TitleBar::new(
            Some("Module01".to_string()),
            LoadStatus::Loading,
            "Opening OCR...".to_string(),
            Some(2),
        ));
        assert!(text.contains("⠹ Module01: Loading"));
    }

    #[test]
    fn test_title_bar_nothing_loaded() {
        let text = rendered(TitleBar::new(
            None,
            LoadStatus::Failed,
            "Welcome to EduMilestone!".to_string(),
            None,
        ));
        assert!(text.contains("EduMilestone | Welcome"));
        assert!(!text.contains("Failed"));
    }
}
