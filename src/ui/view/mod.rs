//! 视图层模块
//!
//! 包含主渲染入口和各种视图组件

pub mod components;
pub mod layouts;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::state::{App, AppMode, ConfirmAction, Focus, InputField};
use crate::board::Detail;
use components::{highlighted_spans, render_dialog_framework, render_input_widget, star};
use layouts::{centered_rect, split_panes};

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题
            Constraint::Min(10),   // 左右两栏
            Constraint::Length(3), // 帮助
        ])
        .split(frame.area());

    render_title(frame, chunks[0]);

    let (left, right) = split_panes(chunks[1]);
    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(left);
    render_search(frame, app, left_chunks[0]);
    render_questions(frame, app, left_chunks[1]);

    match app.view.detail.clone() {
        Some(detail) => render_detail(frame, app, &detail, right),
        None => render_compose(frame, app, right),
    }

    render_help(frame, app, chunks[2]);

    // 渲染弹窗
    if let AppMode::Confirm(action) = &app.mode {
        render_confirm_dialog(frame, action);
    }
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new("💬 Discussion Portal")
        .style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    render_input_widget(
        frame,
        area,
        "Search Question [/]",
        &app.search,
        app.mode == AppMode::Searching,
        Color::Yellow,
    );
}

fn render_questions(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("Questions ({})  [n] New Question", app.view.rows.len());
    let block = Block::default().title(title).borders(Borders::ALL);

    if app.view.rows.is_empty() {
        let hint = if app.search.is_empty() {
            "No questions yet, press [n] to ask one"
        } else {
            "No questions match the search"
        };
        let empty = Paragraph::new(hint)
            .style(Style::default().fg(Color::Gray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .view
        .rows
        .iter()
        .map(|row| {
            let mut heading = vec![Span::raw(star(row.favorite))];
            heading.extend(highlighted_spans(
                &row.subject,
                Style::default().add_modifier(Modifier::BOLD),
            ));
            heading.push(Span::styled(
                format!(" (Upvotes: {}) - {}", row.upvotes, row.age),
                Style::default().fg(Color::Gray),
            ));

            let body = highlighted_spans(&row.question, Style::default());

            let style = if row.selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            ListItem::new(vec![Line::from(heading), Line::from(body)]).style(style)
        })
        .collect();

    let highlight = if app.focus == Focus::Questions {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    let list = List::new(items).block(block).highlight_style(highlight);

    let mut state = ListState::default();
    state.select(Some(app.cursor));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_detail(frame: &mut Frame, app: &App, detail: &Detail, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // 问题
            Constraint::Min(4),    // 回复
            Constraint::Length(3), // 名字
            Constraint::Length(4), // 评论
        ])
        .split(area);

    let question = Paragraph::new(vec![
        Line::from(Span::styled(
            format!(
                "{}{} (Upvotes: {})",
                star(detail.favorite),
                detail.subject,
                detail.upvotes
            ),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("{} - {}", detail.question, detail.age)),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title("Question  [r] Resolve")
            .borders(Borders::ALL),
    );
    frame.render_widget(question, chunks[0]);

    let items: Vec<ListItem> = detail
        .responses
        .iter()
        .map(|response| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::raw(star(response.favorite)),
                    Span::styled(
                        response.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!(" (Upvotes: {}) - {}", response.upvotes, response.age),
                        Style::default().fg(Color::Gray),
                    ),
                ]),
                Line::from(response.comment.clone()),
            ])
        })
        .collect();

    let highlight = if app.focus == Focus::Responses {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    let responses = List::new(items)
        .block(
            Block::default()
                .title(format!("Responses ({})  [Tab] Select", detail.responses.len()))
                .borders(Borders::ALL),
        )
        .highlight_style(highlight);
    let mut state = ListState::default();
    if !detail.responses.is_empty() {
        state.select(Some(app.response_cursor));
    }
    frame.render_stateful_widget(responses, chunks[1], &mut state);

    let composing = matches!(app.mode, AppMode::ComposingResponse(_));
    let field = app.response_form.field;
    render_input_widget(
        frame,
        chunks[2],
        "Name  [c] Add Response",
        &app.response_form.primary,
        composing && field == InputField::Primary,
        Color::Yellow,
    );
    render_input_widget(
        frame,
        chunks[3],
        "Comment",
        &app.response_form.secondary,
        composing && field == InputField::Secondary,
        Color::Yellow,
    );
}

fn render_compose(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
        ])
        .split(area);

    let welcome = Paragraph::new(vec![
        Line::from(Span::styled(
            "Welcome to Discussion Portal",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("Enter a subject and question to get started"),
    ]);
    frame.render_widget(welcome, chunks[0]);

    let composing = app.mode == AppMode::ComposingQuestion;
    let field = app.question_form.field;
    render_input_widget(
        frame,
        chunks[1],
        "Subject",
        &app.question_form.primary,
        composing && field == InputField::Primary,
        Color::Yellow,
    );
    render_input_widget(
        frame,
        chunks[2],
        "Question",
        &app.question_form.secondary,
        composing && field == InputField::Secondary,
        Color::Yellow,
    );
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match &app.mode {
        AppMode::Normal => match app.focus {
            Focus::Questions => {
                "[Enter] Open  [n] New  [c] Compose  [u/d] Vote  [f] Favorite  [/] Search  [Tab] Responses  [r] Resolve  [q] Quit"
            }
            Focus::Responses => "[j/k] Select  [f] Favorite  [u/d] Vote question  [Tab/Esc] Questions  [q] Quit",
        },
        AppMode::Searching => "Type to search  [Enter] Keep  [Esc] Clear",
        AppMode::ComposingQuestion | AppMode::ComposingResponse(_) => {
            "[Enter] Next field / Submit  [Tab] Switch field  [Backspace] Delete  [Esc] Leave form"
        }
        AppMode::Confirm(_) => "[y] Confirm  [n] Cancel",
    };

    let message = app.message.as_deref().unwrap_or("");
    let text = if message.is_empty() {
        help_text.to_string()
    } else {
        format!("{}  |  {}", help_text, message)
    };

    let help = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, area);
}

fn render_confirm_dialog(frame: &mut Frame, action: &ConfirmAction) {
    let area = centered_rect(50, 20, frame.area());
    let inner = render_dialog_framework(frame, area, "⚠️ Confirm");

    let message = match action {
        ConfirmAction::Resolve(_) => "Resolve this question and remove all its responses?",
    };

    let dialog = Paragraph::new(format!("{}\n\n[y] Confirm  [n] Cancel", message))
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true });
    frame.render_widget(dialog, inner);
}
