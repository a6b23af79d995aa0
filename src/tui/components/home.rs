//! # Home Screen Component
//!
//! Welcome banner plus one button per tool feature. The highlighted
//! button follows `App::selected`.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph};

use crate::tui::component::Component;

const BANNER: [&str; 3] = [
    "Welcome to EduMilestone!",
    "Milestone Module 01",
    "Products: Tools Section",
];

pub struct HomeScreen<'a> {
    pub features: &'a [String],
    pub selected: usize,
}

impl<'a> HomeScreen<'a> {
    pub fn new(features: &'a [String], selected: usize) -> Self {
        Self { features, selected }
    }
}

fn button_color(feature: &str) -> Color {
    match feature {
        "OCR" => Color::Rgb(0xA5, 0xD6, 0xA7),
        "PDF" => Color::Rgb(0xFF, 0xCD, 0xD2),
        "WORD" => Color::Rgb(0x81, 0xD4, 0xFA),
        _ => Color::Gray,
    }
}

impl Component for HomeScreen<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let banner: Vec<Line> = BANNER
            .iter()
            .map(|text| {
                Line::from(Span::styled(
                    *text,
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ))
            })
            .collect();

        let list_height = self.features.len() as u16 + 2;
        let [banner_area, _, list_area] = Layout::vertical([
            Constraint::Length(banner.len() as u16),
            Constraint::Length(1),
            Constraint::Length(list_height),
        ])
        .flex(Flex::Center)
        .areas(area);

        frame.render_widget(
            Paragraph::new(banner).alignment(Alignment::Center),
            banner_area,
        );

        let [list_area] = Layout::horizontal([Constraint::Length(30)])
            .flex(Flex::Center)
            .areas(list_area);

        let items: Vec<ListItem> = self
            .features
            .iter()
            .map(|feature| {
                ListItem::new(Line::from(feature.as_str()).alignment(Alignment::Center))
                    .style(Style::default().fg(button_color(feature)))
            })
            .collect();

        let mut state = ListState::default();
        if !self.features.is_empty() {
            state.select(Some(self.selected.min(self.features.len() - 1)));
        }

        let list = List::new(items)
            .block(Block::bordered().title("Tools"))
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, list_area, &mut state);
    }
}
