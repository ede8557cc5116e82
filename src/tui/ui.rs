use super::app::{App, Focus};
use crate::image_slot::ImageSlots;
use crate::models::Achievement;
use crate::session::view::{DetailBody, PrimaryView};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

const ACCENT: Color = Color::Cyan;

pub fn draw(f: &mut Frame, app: &mut App) {
    let view = app.session.view();
    let banner_height = if view.error_banner.is_some() { 3 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "Achievement Explorer",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  discover game achievements and how to unlock them"),
    ]));
    f.render_widget(title, chunks[0]);

    draw_search_box(f, app, chunks[1]);

    if let Some(message) = &view.error_banner {
        let banner = Paragraph::new(message.as_str())
            .style(Style::default().fg(Color::LightRed))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Red)));
        f.render_widget(banner, chunks[2]);
    }

    match view.primary {
        PrimaryView::Idle => draw_hint(
            f,
            chunks[3],
            "Type at least 2 characters to search by game name or Steam App ID.",
        ),
        PrimaryView::Searching => draw_hint(f, chunks[3], "Searching games..."),
        PrimaryView::NoGamesFound => draw_hint(
            f,
            chunks[3],
            &format!("No games found for \"{}\".", app.session.state().query.trim()),
        ),
        PrimaryView::Results => draw_results(f, app, chunks[3]),
        PrimaryView::DetailLoading => draw_hint(f, chunks[3], "Loading achievements..."),
        PrimaryView::Detail(body) => draw_detail(f, app, chunks[3], body),
    }

    draw_footer(f, app, chunks[4]);
}

fn draw_search_box(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Query && app.session.state().selected.is_none();
    let border = if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let query = &app.session.state().query;
    let text = if query.is_empty() {
        Line::from(Span::styled(
            "Search by game name or Steam App ID...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(query.as_str())
    };

    f.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(" Search "),
        ),
        area,
    );

    if focused {
        f.set_cursor_position((cursor_x(area, query), area.y + 1));
    }
}

/// Column just after the typed text, kept inside the box borders.
fn cursor_x(area: Rect, query: &str) -> u16 {
    let typed = u16::try_from(query.chars().count()).unwrap_or(u16::MAX);
    area.x
        .saturating_add(1)
        .saturating_add(typed)
        .min(area.right().saturating_sub(2))
}

fn draw_hint(f: &mut Frame, area: Rect, text: &str) {
    let hint = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(hint, area);
}

fn draw_results(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .session
        .state()
        .results
        .iter()
        .map(|entry| {
            let mut spans = vec![
                Span::styled(entry.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("  App ID: {}", entry.id),
                    Style::default().fg(Color::DarkGray),
                ),
            ];
            if let Some(image) = app.images.visible(entry.image_url.as_deref()) {
                spans.push(Span::styled(
                    format!("  [{}]", image),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Search Results "),
        )
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");

    if app.focus == Focus::Results {
        f.render_stateful_widget(list, area, &mut app.results_state);
    } else {
        f.render_widget(list, area);
    }
}

fn draw_detail(f: &mut Frame, app: &mut App, area: Rect, body: DetailBody) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(area);

    let state = app.session.state();
    let Some(selected) = state.selected.as_ref() else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            selected.name().to_string(),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "App ID: {}   {} Achievements",
            selected.id(),
            state.achievements.len()
        )),
    ];
    if let Some(header) = app.images.visible(selected.header_image_url.as_deref()) {
        lines.push(Line::from(Span::styled(
            format!("Header: {}", header),
            Style::default().fg(Color::DarkGray),
        )));
    }
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Game ")
                .title_bottom(" Esc: Back to Search "),
        ),
        chunks[0],
    );

    match body {
        DetailBody::Achievements => draw_achievements(f, app, chunks[1]),
        DetailBody::NoAchievements => {
            draw_hint(f, chunks[1], "No achievements found for this game.")
        }
        DetailBody::Unavailable if app.session.can_retry_details() => draw_hint(
            f,
            chunks[1],
            "Achievements could not be loaded. Press r to retry.",
        ),
        DetailBody::Unavailable => {
            draw_hint(f, chunks[1], "Achievements are not available for this game.")
        }
    }
}

fn achievement_item(ach: &Achievement, images: &ImageSlots) -> ListItem<'static> {
    let mut title = vec![Span::styled(
        ach.title().to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if ach.hidden {
        title.push(Span::styled(" [hidden]", Style::default().fg(Color::Yellow)));
    }
    if let Some(icon) = images.visible(ach.icon_url.as_deref()) {
        title.push(Span::styled(
            format!("  [{}]", icon),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if let Some(p) = ach.unlock_percent {
        title.push(Span::styled(
            format!("  {:.1}% of players", p),
            Style::default().fg(Color::Green),
        ));
    }

    let description = ach
        .description
        .clone()
        .unwrap_or_else(|| "No description available".to_string());

    ListItem::new(vec![
        Line::from(title),
        Line::from(Span::styled(
            format!("  {}", description),
            Style::default().fg(Color::Gray),
        )),
    ])
}

fn draw_achievements(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let items: Vec<ListItem> = app
        .session
        .state()
        .achievements
        .iter()
        .map(|ach| achievement_item(ach, &app.images))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Achievements ")
                .title_bottom(" Enter: how to unlock "),
        )
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, chunks[0], &mut app.achievements_state);

    let (ratio, label) = match app.highlighted_achievement() {
        Some(ach) => match (ach.unlock_ratio(), ach.unlock_percent) {
            (Some(r), Some(p)) => (r, format!("{:.1}% unlocked", p)),
            _ => (0.0, "No global stats".to_string()),
        },
        None => (0.0, String::new()),
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Unlock rate "))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(ratio)
        .label(label);
    f.render_widget(gauge, chunks[1]);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let text = if let Some(notice) = &app.notice {
        notice.clone()
    } else if app.session.state().selected.is_some() {
        "↑/↓ move  Enter/g guide  r retry  Esc back  Ctrl-C quit".to_string()
    } else if app.focus == Focus::Results {
        "↑/↓ move  Enter open  / search  Ctrl-C quit".to_string()
    } else {
        "type to search  ↓ results  Esc clear/quit  Ctrl-C quit".to_string()
    };
    f.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
