use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Tabs, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::catalog::PromptRecord;
use crate::config::{GALLERY_HINTS, GENERATOR_HINTS};
use crate::markdown;
use crate::ui_state::{Screen, COPIED_LABEL, GENERATION_FAILED_MESSAGE};

// Copper Sapphire Morning color palette
const BG_DARK: Color = Color::Rgb(12, 12, 16);           // Deep background
const BG_PANEL: Color = Color::Rgb(18, 18, 24);          // Slightly lighter for panels

const SAPPHIRE: Color = Color::Rgb(101, 150, 243);       // #6596F3 - Primary accent
const CYAN_LIGHT: Color = Color::Rgb(178, 220, 226);     // #B2DCE2 - Light cyan
const COPPER: Color = Color::Rgb(138, 72, 38);           // #8A4826 - Copper
const PALE_YELLOW: Color = Color::Rgb(234, 208, 148);    // #EAD094 - Pale yellow
const BURGUNDY: Color = Color::Rgb(204, 92, 68);         // #CC5C44 - Warnings/errors
const OLIVE: Color = Color::Rgb(131, 179, 102);          // #83B366 - Success/green
const LAVENDER: Color = Color::Rgb(211, 164, 234);       // #D3A4EA - Category badges

const TEXT_PRIMARY: Color = Color::Rgb(240, 240, 245);   // Near white
const TEXT_SECONDARY: Color = Color::Rgb(180, 180, 190); // Light gray
const TEXT_MUTED: Color = Color::Rgb(105, 116, 133);     // #697485 - Medium gray

const BORDER_DIM: Color = Color::Rgb(45, 50, 60);        // Dim border

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn draw(frame: &mut Frame, app: &App) {
    // Fill entire background
    let bg = Block::default().style(Style::default().bg(BG_DARK));
    frame.render_widget(bg, frame.area());

    match app.ui.screen {
        Screen::Gallery => draw_gallery(frame, app),
        Screen::Generator => draw_generator(frame, app),
    }
}

/// Greedy word wrap by display width. Words wider than the line are split.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![];
    }

    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if current.is_empty() {
                word.width()
            } else {
                current.width() + 1 + word.width()
            };
            if needed <= max_width {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if word.width() <= max_width {
                current.push_str(word);
                continue;
            }
            for ch in word.chars() {
                if current.width() + ch.to_string().width() > max_width {
                    lines.push(std::mem::take(&mut current));
                }
                current.push(ch);
            }
        }
        lines.push(current);
    }
    lines
}

/// Animated border color cycling between sapphire and copper
fn glow_color(anim_frame: usize) -> Color {
    let t = (anim_frame as f64 / 30.0).sin() * 0.5 + 0.5;
    let r = (101.0 + (138.0 - 101.0) * t) as u8;
    let g = (150.0 + (72.0 - 150.0) * t) as u8;
    let b = (243.0 + (38.0 - 243.0) * t) as u8;
    Color::Rgb(r, g, b)
}

fn draw_hints(frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let mut spans = Vec::new();
    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", Style::default().fg(TEXT_MUTED)));
        }
        spans.push(Span::styled(
            key.to_string(),
            Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" {}", desc), Style::default().fg(TEXT_MUTED)));
    }
    let hints = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(hints, area);
}

fn draw_gallery(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let padded = Rect {
        x: area.x + 1,
        y: area.y,
        width: area.width.saturating_sub(2),
        height: area.height,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Length(3), // Category tabs
            Constraint::Min(3),    // Cards
            Constraint::Length(1), // Hints
        ])
        .split(padded);

    draw_header(frame, app, chunks[0]);
    draw_category_tabs(frame, app, chunks[1]);
    draw_cards(frame, app, chunks[2]);
    draw_hints(frame, chunks[3], GALLERY_HINTS);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "✦ Prompt Gallery",
            Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Discover and experiment with powerful prompts for generative AI.",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];
    if !app.has_credential() {
        lines.push(Line::from(Span::styled(
            "API_KEY is not set: generation will fail",
            Style::default().fg(BURGUNDY),
        )));
    }

    let header = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(header, area);
}

fn draw_category_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let categories = app.catalog.categories();
    let selected = categories
        .iter()
        .position(|c| *c == app.ui.active_category)
        .unwrap_or(0);

    let tabs = Tabs::new(categories)
        .select(selected)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_DIM)),
        )
        .style(Style::default().fg(TEXT_MUTED))
        .highlight_style(
            Style::default()
                .fg(CYAN_LIGHT)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider(Span::styled("│", Style::default().fg(BORDER_DIM)));
    frame.render_widget(tabs, area);
}

fn card_height(prompt: &PromptRecord, width: u16) -> u16 {
    // Borders, wrapped body, action row
    let body = wrap_text(&prompt.body, width.saturating_sub(4) as usize).len() as u16;
    body + 3
}

fn draw_cards(frame: &mut Frame, app: &App, area: Rect) {
    let prompts = app.catalog.filter(&app.ui.active_category);

    if prompts.is_empty() {
        let empty = Paragraph::new("No prompts in this category")
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_MUTED));
        frame.render_widget(empty, area);
        return;
    }

    let cursor = app.ui.cursor.min(prompts.len() - 1);
    let heights: Vec<u16> = prompts.iter().map(|p| card_height(p, area.width)).collect();

    // First visible card: scroll just enough to keep the cursor on screen
    let mut first = 0;
    while first < cursor && heights[first..=cursor].iter().sum::<u16>() > area.height {
        first += 1;
    }

    let mut y = area.y;
    for (index, prompt) in prompts.iter().enumerate().skip(first) {
        let height = heights[index];
        let bottom = area.y + area.height;
        if y >= bottom {
            break;
        }
        let card_area = Rect {
            x: area.x,
            y,
            width: area.width,
            height: height.min(bottom - y),
        };
        draw_card(frame, app, prompt, card_area, index == cursor);
        y += height;
    }
}

fn draw_card(frame: &mut Frame, app: &App, prompt: &PromptRecord, area: Rect, highlighted: bool) {
    let border_color = if highlighted {
        glow_color(app.animation_frame)
    } else {
        BORDER_DIM
    };
    let title_style = if highlighted {
        Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_SECONDARY).add_modifier(Modifier::BOLD)
    };

    let block = Block::default()
        .title(Line::from(Span::styled(format!(" {} ", prompt.title), title_style)))
        .title(
            Line::from(Span::styled(
                format!(" {} ", prompt.category),
                Style::default().fg(LAVENDER),
            ))
            .right_aligned(),
        )
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(BG_PANEL));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let body_style = Style::default().fg(if highlighted { TEXT_PRIMARY } else { TEXT_SECONDARY });
    let mut lines: Vec<Line> = wrap_text(&prompt.body, inner.width.saturating_sub(2) as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(format!(" {}", l), body_style)))
        .collect();

    let copy_label = app.ui.copy_label(prompt.id);
    let copy_style = if copy_label == COPIED_LABEL {
        Style::default().fg(OLIVE).add_modifier(Modifier::BOLD)
    } else if highlighted {
        Style::default().fg(PALE_YELLOW)
    } else {
        Style::default().fg(TEXT_MUTED)
    };
    let use_style = if highlighted {
        Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_MUTED)
    };
    lines.push(Line::from(vec![
        Span::styled(" [Enter] Use Prompt", use_style),
        Span::raw("   "),
        Span::styled(format!("[c] {}", copy_label), copy_style),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_generator(frame: &mut Frame, app: &App) {
    let Some(prompt) = app.ui.selected_prompt.as_ref() else {
        return;
    };

    let area = frame.area();
    let padded = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(1),
    };

    let prompt_height = wrap_text(&prompt.body, padded.width.saturating_sub(4) as usize).len() as u16 + 3;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Back
            Constraint::Length(1),             // Gap
            Constraint::Length(prompt_height), // Prompt
            Constraint::Length(3),             // Generate button
            Constraint::Min(3),                // Output
            Constraint::Length(1),             // Hints
        ])
        .split(padded);

    let back = Paragraph::new(Line::from(vec![
        Span::styled("← ", Style::default().fg(COPPER).add_modifier(Modifier::BOLD)),
        Span::styled("Back to Gallery", Style::default().fg(TEXT_SECONDARY)),
        Span::styled(" (Esc)", Style::default().fg(TEXT_MUTED)),
    ]));
    frame.render_widget(back, chunks[0]);

    draw_prompt_panel(frame, app, prompt, chunks[2]);
    draw_generate_button(frame, app, chunks[3]);
    draw_output(frame, app, chunks[4]);
    draw_hints(frame, chunks[5], GENERATOR_HINTS);
}

fn draw_prompt_panel(frame: &mut Frame, app: &App, prompt: &PromptRecord, area: Rect) {
    let copy_label = app.ui.copy_label(prompt.id);
    let copy_color = if copy_label == COPIED_LABEL { OLIVE } else { TEXT_MUTED };

    let block = Block::default()
        .title(Line::from(Span::styled(
            format!(" {} ", prompt.title),
            Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD),
        )))
        .title(
            Line::from(Span::styled(
                format!(" {} ", prompt.category),
                Style::default().fg(LAVENDER),
            ))
            .right_aligned(),
        )
        .title_bottom(
            Line::from(Span::styled(
                format!(" [c] {} ", copy_label),
                Style::default().fg(copy_color),
            ))
            .right_aligned(),
        )
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_DIM))
        .style(Style::default().bg(BG_PANEL));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = wrap_text(&prompt.body, inner.width.saturating_sub(2) as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(format!(" {}", l), Style::default().fg(TEXT_PRIMARY))))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_generate_button(frame: &mut Frame, app: &App, area: Rect) {
    let width = 24.min(area.width);
    let button_area = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y,
        width,
        height: area.height,
    };

    let (label, border, text) = if app.ui.is_loading {
        ("Generating...", BORDER_DIM, TEXT_MUTED)
    } else {
        ("✨ Generate", glow_color(app.animation_frame), PALE_YELLOW)
    };

    let button = Paragraph::new(label)
        .alignment(Alignment::Center)
        .style(Style::default().fg(text).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(border)),
        );
    frame.render_widget(button, button_area);
}

fn draw_output(frame: &mut Frame, app: &App, area: Rect) {
    let mode = if app.ui.show_raw_output { "raw" } else { "preview" };
    let mut block = Block::default()
        .title(Line::from(Span::styled(
            " Output ",
            Style::default().fg(COPPER).add_modifier(Modifier::BOLD),
        )))
        .title(
            Line::from(Span::styled(format!(" {} ", mode), Style::default().fg(TEXT_MUTED)))
                .right_aligned(),
        )
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_DIM));

    if let Some(at) = app.ui.generated_at {
        block = block.title_bottom(
            Line::from(Span::styled(
                format!(" generated {} ", at.format("%H:%M:%S")),
                Style::default().fg(TEXT_MUTED),
            ))
            .right_aligned(),
        );
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.ui.is_loading {
        let spinner = SPINNER[(app.animation_frame / 6) % SPINNER.len()];
        let loading = Paragraph::new(Line::from(vec![
            Span::styled(spinner, Style::default().fg(SAPPHIRE)),
            Span::styled(" Generating...", Style::default().fg(TEXT_SECONDARY)),
        ]))
        .alignment(Alignment::Center);
        let center = Rect {
            y: inner.y + inner.height / 2,
            height: 1.min(inner.height),
            ..inner
        };
        frame.render_widget(loading, center);
        return;
    }

    if app.ui.generated_text.is_empty() {
        let hint = Paragraph::new("Press g to generate a response for this prompt.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_MUTED));
        frame.render_widget(hint, inner);
        return;
    }

    if app.ui.generated_text == GENERATION_FAILED_MESSAGE {
        let failed = Paragraph::new(GENERATION_FAILED_MESSAGE)
            .style(Style::default().fg(BURGUNDY))
            .wrap(Wrap { trim: false });
        frame.render_widget(failed, inner);
        return;
    }

    let lines = if app.ui.show_raw_output {
        markdown::render_raw(&app.ui.generated_text)
    } else {
        markdown::render_markdown(&app.ui.generated_text)
    };
    let output = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.ui.output_scroll, 0));
    frame.render_widget(output, inner);
}
