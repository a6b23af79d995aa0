use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Span;

use crate::core::state::App;
use crate::navigation::Route;
use crate::tui::component::Component;
use crate::tui::components::{FeatureScreen, HomeScreen, TitleBar};

pub fn draw_ui(frame: &mut Frame, app: &App, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(1)]);
    let [title_area, main_area, hint_area] = layout.areas(frame.area());

    let busy = app.pending_feature.is_some() || app.load_status.is_transient();
    TitleBar::new(
        app.active_module.as_ref().map(|m| m.module_name.clone()),
        app.load_status,
        app.status_message.clone(),
        busy.then_some(spinner_frame),
    )
    .render(frame, title_area);

    match &app.screen {
        Route::Home => HomeScreen::new(&app.features, app.selected).render(frame, main_area),
        Route::Feature(feature) => FeatureScreen::new(feature).render(frame, main_area),
    }

    frame.render_widget(
        Span::styled(hint_text(&app.screen), Style::default().fg(Color::DarkGray)),
        hint_area,
    );
}

fn hint_text(screen: &Route) -> &'static str {
    match screen {
        Route::Home => "↑/↓ select · Enter open · Esc/q quit",
        Route::Feature(_) => "Esc back · q quit",
    }
}
