//! # Feature Screen Component
//!
//! Placeholder screen for a tool feature. The tools have no processing
//! logic yet; the screen confirms the module is up and explains how to
//! go back.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::modules::Tool;
use crate::tui::component::Component;

pub struct FeatureScreen<'a> {
    pub feature: &'a str,
}

impl<'a> FeatureScreen<'a> {
    pub fn new(feature: &'a str) -> Self {
        Self { feature }
    }
}

impl Component for FeatureScreen<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let description = Tool::from_feature(self.feature)
            .map(Tool::description)
            .unwrap_or("This tool is not available yet.");

        let lines = vec![
            Line::from(Span::styled(
                format!("{} Tool", self.feature),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(description),
            Line::from(""),
            Line::from(Span::styled(
                "Press Esc to return home",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .block(Block::bordered().title(self.feature))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}
