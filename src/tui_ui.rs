use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, TableState, Wrap},
};

use aicompare::recommend::ScoredCandidate;
use aicompare::wizard::Question;

use crate::tui_app::App;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title + progress
            Constraint::Min(10),   // question or results
            Constraint::Length(1), // status bar
        ])
        .split(frame.area());

    draw_header(frame, app, outer[0]);

    match app.question() {
        Some(question) => draw_question(frame, app, question, outer[1]),
        None => {
            let main = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(outer[1]);
            draw_results(frame, app, main[0]);
            draw_detail(frame, app, main[1]);
        }
    }

    draw_status_bar(frame, app, outer[2]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let total = Question::ALL.len();
    let step = app.wizard.step().min(total);
    let label = if step == total {
        " Recommendations ".to_string()
    } else {
        format!(" Question {} of {} ", step + 1, total)
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" aicompare ")
                .title_style(Style::default().fg(Color::Cyan).bold()),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(step as f64 / total as f64)
        .label(label);
    frame.render_widget(gauge, area);
}

fn draw_question(frame: &mut Frame, app: &App, question: Question, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", question.title()),
            Style::default().fg(Color::White).bold(),
        )),
        Line::from(""),
    ];

    for (i, (_, label)) in question.options().iter().enumerate() {
        let selected = i == app.cursor;
        let marker = if selected { "▶" } else { " " };
        let style = if selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(vec![
            Span::raw(format!("  {} ", marker)),
            Span::styled(format!(" {}. {} ", i + 1, label), style),
        ]));
    }

    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn score_color(score: f64) -> Color {
    if score >= 150.0 {
        Color::Green
    } else if score >= 75.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn draw_results(frame: &mut Frame, app: &App, area: Rect) {
    let results = app.results();
    if results.is_empty() {
        let text = Paragraph::new(vec![
            Line::from(""),
            Line::from("  No models match these answers."),
            Line::from("  Press b to change an answer or r to start over."),
        ])
        .block(Block::default().borders(Borders::ALL).title(" Results "));
        frame.render_widget(text, area);
        return;
    }

    let header = Row::new(["#", "Model", "Score", "$/1M"].map(|h| {
        Cell::from(h).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let rows: Vec<Row> = results
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(c.name.clone()).style(Style::default().fg(Color::White)),
                Cell::from(format!("{:.1}", c.score))
                    .style(Style::default().fg(score_color(c.score))),
                Cell::from(if c.model.is_free() {
                    "free".to_string()
                } else {
                    format!("{:.2}", c.model.cost_per_1m)
                }),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Min(18),
        Constraint::Length(7),
        Constraint::Length(7),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(" Results "))
        .row_highlight_style(Style::default().bg(Color::DarkGray).bold())
        .highlight_symbol("▶ ");

    let mut state = TableState::default().with_selected(Some(app.cursor));
    frame.render_stateful_widget(table, area, &mut state);
}

/// `hex` is a sanitized `#rrggbb` value.
fn hex_to_color(hex: &str) -> Color {
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
    Color::Rgb(channel(1), channel(3), channel(5))
}

fn draw_detail(frame: &mut Frame, app: &App, area: Rect) {
    let Some(candidate) = app.selected_result() else {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" No model selected ");
        frame.render_widget(block, area);
        return;
    };

    let lines = detail_lines(candidate);
    let accent = hex_to_color(candidate.model.display_color());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(format!(" {} ", candidate.name));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn detail_lines(c: &ScoredCandidate) -> Vec<Line<'static>> {
    let label = |text: &str| Span::styled(format!("  {:<12}", text), Style::default().fg(Color::DarkGray));
    let value = |text: String| Span::styled(text, Style::default().fg(Color::White));

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![label("Provider:"), value(c.model.provider.clone())]),
        Line::from(vec![label("Type:"), value(c.model.category.label().to_string())]),
        Line::from(vec![label("Cost:"), value(format!("${:.2} per 1M tokens", c.model.cost_per_1m))]),
        Line::from(vec![label("Context:"), value(format!("{}K tokens", c.model.context_window))]),
        Line::from(vec![label("Speed:"), value(format!("{:.0} tok/s", c.model.speed_tokens))]),
        Line::from(vec![label("Quality:"), value(format!("{}/10", c.model.quality))]),
        Line::from(""),
        Line::from(Span::styled("  Why it fits", Style::default().fg(Color::Cyan).bold())),
    ];
    for reason in &c.reasons {
        lines.push(Line::from(vec![
            Span::styled("    + ", Style::default().fg(Color::Green)),
            Span::raw(reason.clone()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Capabilities",
        Style::default().fg(Color::Cyan).bold(),
    )));
    for (name, pct) in c.model.capabilities.as_percentages() {
        let filled = (pct / 10.0).round().clamp(0.0, 10.0) as usize;
        lines.push(Line::from(vec![
            label(name),
            Span::styled("█".repeat(filled), Style::default().fg(Color::Green)),
            Span::styled("░".repeat(10 - filled), Style::default().fg(Color::DarkGray)),
            Span::raw(format!(" {:.0}%", pct)),
        ]));
    }
    lines
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let keys = if app.wizard.is_complete() {
        " ↑↓/jk:nav  b:back  r:restart  s:save  q:quit"
    } else {
        " ↑↓/jk:nav  Enter/1-9:choose  b:back  q:quit"
    };

    let mut spans = vec![Span::styled(keys, Style::default().fg(Color::DarkGray))];
    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!("  {}", status),
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
