//! Renderização das telas com ratatui.

use ratatui::{
    Frame,
    prelude::*,
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Row, Table, Wrap},
};

use crate::{
    events::Screen,
    form::{FIELD_COUNT, Metadata},
    input::render_input_box,
    layout::{centered_box, create_body_layout, create_main_layout},
    shortcuts::format_keys,
    submission::{Phase, default_document_name},
};

use super::App;

/// Desenha a tela ativa e os popups por cima dela.
pub fn draw(f: &mut Frame, app: &App) {
    // Fundo com o estilo do tema.
    f.render_widget(Block::default().style(app.theme.base()), f.area());

    match app.ui.screen {
        Screen::Login => draw_login(f, app),
        Screen::Transcription => draw_transcription(f, app),
        Screen::Users => draw_users(f, app),
    }

    if app.ui.show_preview {
        draw_preview_popup(f, app);
    }
    if let Some(state) = &app.input_box {
        render_input_box(f, state, app.theme);
    }
}

/// Tela de login centralizada.
fn draw_login(f: &mut Frame, app: &App) {
    let area = centered_box(f.area(), 50, 12);
    let block = Block::default()
        .borders(Borders::ALL)
        .title("CMUrb — Transcrição de Entrevistas")
        .title_style(app.theme.title());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let masked: String = app.login_password.chars().map(|_| '*').collect();
    let mut lines = vec![
        Line::raw(""),
        Line::from(vec![
            Span::styled("  Usuário: ", Style::default().fg(app.theme.dim())),
            Span::raw(app.login_username.clone()),
        ]),
        Line::from(vec![
            Span::styled("  Senha:   ", Style::default().fg(app.theme.dim())),
            Span::raw(masked),
        ]),
        Line::raw(""),
    ];
    if let Some(err) = &app.ui.error {
        lines.push(Line::styled(format!("  {err}"), app.theme.error()));
    } else {
        lines.push(Line::styled(
            format!("  {}", app.ui.status),
            Style::default().fg(app.theme.dim()),
        ));
    }
    lines.push(Line::raw(""));

    let sc = &app.shortcuts.login;
    lines.push(Line::styled(
        format!(
            "  {}=usuário  {}=senha  {}=entrar  {}=sair",
            format_keys(&sc.username),
            format_keys(&sc.password),
            format_keys(&sc.submit),
            format_keys(&sc.quit),
        ),
        Style::default().fg(app.theme.dim()),
    ));

    f.render_widget(Paragraph::new(lines), inner);
}

/// Tela principal: formulário à esquerda, processamento à direita.
fn draw_transcription(f: &mut Frame, app: &App) {
    let main = create_main_layout(f.area());
    let body = create_body_layout(main.body);

    draw_form_panel(f, app, body.form_panel);
    draw_side_panel(f, app, body.side_panel);

    let sc = &app.shortcuts.transcription;
    let help = format!(
        "{}=editar  {}=anexar  {}=tag  {}=remover tag  {}=enviar  {}=baixar  \
         {}=prévia  {}=limpar  {}=tema  {}=usuários  {}=sair da conta  {}=fechar",
        format_keys(&sc.edit_field),
        format_keys(&sc.attach_file),
        format_keys(&sc.add_tag),
        format_keys(&sc.remove_tag),
        format_keys(&sc.submit),
        format_keys(&sc.download),
        format_keys(&sc.preview),
        format_keys(&sc.reset),
        format_keys(&sc.theme),
        format_keys(&sc.users),
        format_keys(&sc.logout),
        format_keys(&sc.quit),
    );
    draw_help_bar(f, app, main.help_bar, &help);
    draw_status_bar(f, app, main.status_bar);
}

/// Formulário de metadados + tags + arquivo anexado.
fn draw_form_panel(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(FIELD_COUNT as u16 + 2),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    // Tabela de campos, com a linha selecionada em destaque.
    let rows: Vec<Row> = (0..FIELD_COUNT)
        .map(|idx| {
            let row = Row::new(vec![
                Metadata::field_label(idx).to_string(),
                app.draft.metadata.field_value(idx),
            ]);
            if idx == app.ui.selected_field {
                row.style(app.theme.highlight())
            } else {
                row.style(app.theme.base())
            }
        })
        .collect();
    let table = Table::new(rows, [Constraint::Length(22), Constraint::Min(10)]).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Dados da Entrevista")
            .title_style(app.theme.title()),
    );
    f.render_widget(table, chunks[0]);

    let tags = if app.draft.tags.is_empty() {
        Line::styled("(nenhuma)", Style::default().fg(app.theme.dim()))
    } else {
        Line::raw(app.draft.tags.joined())
    };
    f.render_widget(
        Paragraph::new(tags).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Tags")
                .title_style(app.theme.title()),
        ),
        chunks[1],
    );

    let file = match &app.draft.file {
        Some(file) => Line::raw(format!(
            "{} ({:.1} MB)",
            file.name,
            file.size_bytes as f64 / (1024.0 * 1024.0)
        )),
        None => Line::styled(
            "(nenhum arquivo anexado)",
            Style::default().fg(app.theme.dim()),
        ),
    };
    f.render_widget(
        Paragraph::new(file).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Arquivo")
                .title_style(app.theme.title()),
        ),
        chunks[2],
    );
}

/// Painel lateral: estado do processamento em cima, log embaixo.
fn draw_side_panel(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(3)])
        .split(area);

    draw_processing_panel(f, app, chunks[0]);
    draw_log_panel(f, app, chunks[1]);
}

fn draw_processing_panel(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Processamento")
        .title_style(app.theme.title());
    let inner = block.inner(area);
    f.render_widget(block, area);

    match app.controller.phase() {
        Phase::Idle => {
            let text = Paragraph::new(vec![
                Line::raw("Preencha os campos, anexe o arquivo"),
                Line::raw("da gravação e envie para transcrição."),
            ])
            .style(Style::default().fg(app.theme.dim()))
            .wrap(Wrap { trim: true });
            f.render_widget(text, inner);
        }
        Phase::Submitting => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1),
                    Constraint::Length(1),
                    Constraint::Length(1),
                ])
                .split(inner);

            let percent = app.controller.percent();
            let gauge = Gauge::default()
                .ratio(percent / 100.0)
                .label(format!("{percent:.0}%"))
                .gauge_style(
                    Style::default()
                        .fg(app.theme.accent())
                        .bg(Color::DarkGray),
                );
            f.render_widget(gauge, rows[0]);

            if let Some(progress) = app.controller.progress() {
                let eta = Paragraph::new(format!(
                    "restam ~{} (estimativa)",
                    progress.remaining_label()
                ))
                .style(Style::default().fg(app.theme.dim()));
                f.render_widget(eta, rows[1]);
            }
            let note = Paragraph::new("A transcrição continua no servidor.")
                .style(Style::default().fg(app.theme.dim()));
            f.render_widget(note, rows[2]);
        }
        Phase::Succeeded => {
            let name = app
                .controller
                .result()
                .and_then(|r| r.file_name.clone())
                .unwrap_or_else(|| default_document_name(&app.draft.metadata.entrevistado));
            let sc = &app.shortcuts.transcription;
            let text = Paragraph::new(vec![
                Line::styled("Transcrição concluída!", app.theme.success()),
                Line::raw(name),
                Line::raw(""),
                Line::styled(
                    format!(
                        "{}=baixar  {}=prévia  {}=nova transcrição",
                        format_keys(&sc.download),
                        format_keys(&sc.preview),
                        format_keys(&sc.reset),
                    ),
                    Style::default().fg(app.theme.dim()),
                ),
            ])
            .wrap(Wrap { trim: true });
            f.render_widget(text, inner);
        }
        Phase::Failed => {
            let sc = &app.shortcuts.transcription;
            let message = app.controller.last_error().unwrap_or("erro desconhecido");
            let text = Paragraph::new(vec![
                Line::styled("A transcrição falhou.", app.theme.error()),
                Line::raw(message.to_string()),
                Line::raw(""),
                Line::styled(
                    format!(
                        "{}=tentar novamente  {}=limpar",
                        format_keys(&sc.submit),
                        format_keys(&sc.reset),
                    ),
                    Style::default().fg(app.theme.dim()),
                ),
            ])
            .wrap(Wrap { trim: true });
            f.render_widget(text, inner);
        }
    }
}

fn draw_log_panel(f: &mut Frame, app: &App, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = app
        .ui
        .log
        .iter()
        .rev()
        .take(visible)
        .rev()
        .map(|entry| Line::styled(entry.clone(), Style::default().fg(app.theme.dim())))
        .collect();
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Log")
                .title_style(app.theme.title()),
        ),
        area,
    );
}

/// Tela de gestão de usuários (somente admin).
fn draw_users(f: &mut Frame, app: &App) {
    let main = create_main_layout(f.area());

    let header = Row::new(vec!["Login", "Nome", "Tipo"]).style(app.theme.title());
    let rows: Vec<Row> = app
        .users
        .iter()
        .enumerate()
        .map(|(idx, user)| {
            let marked = app.pending_delete.as_deref() == Some(user.username.as_str());
            let label = if marked {
                format!("{} (confirmar exclusão?)", user.role.label())
            } else {
                user.role.label().to_string()
            };
            let row = Row::new(vec![user.username.clone(), user.name.clone(), label]);
            if idx == app.ui.selected_user {
                row.style(app.theme.highlight())
            } else if marked {
                row.style(app.theme.error())
            } else {
                row.style(app.theme.base())
            }
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Min(20),
            Constraint::Length(30),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Usuários")
            .title_style(app.theme.title()),
    );
    f.render_widget(table, main.body);

    let sc = &app.shortcuts.users;
    let help = format!(
        "{}=novo  {}=excluir  {}=atualizar  {}/{} =navegar  {}=voltar  {}=fechar",
        format_keys(&sc.new_user),
        format_keys(&sc.delete),
        format_keys(&sc.refresh),
        format_keys(&sc.up),
        format_keys(&sc.down),
        format_keys(&sc.back),
        format_keys(&sc.quit),
    );
    draw_help_bar(f, app, main.help_bar, &help);
    draw_status_bar(f, app, main.status_bar);
}

fn draw_help_bar(f: &mut Frame, app: &App, area: Rect, help: &str) {
    f.render_widget(
        Paragraph::new(help)
            .style(Style::default().fg(app.theme.dim()))
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let who = app
        .session
        .as_ref()
        .map(|s| format!("{} ({})", s.name, s.role.label()))
        .unwrap_or_else(|| "sem sessão".into());

    let (message, style) = match &app.ui.error {
        Some(err) => (err.clone(), app.theme.error()),
        None => (app.ui.status.clone(), app.theme.base()),
    };
    let line = Line::from(vec![
        Span::styled(format!("[{who}] "), Style::default().fg(app.theme.dim())),
        Span::styled(message, style),
    ]);
    f.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

/// Popup com a prévia textual da transcrição.
fn draw_preview_popup(f: &mut Frame, app: &App) {
    let Some(result) = app.controller.result() else {
        return;
    };
    let area = centered_box(f.area(), 80, 20);
    f.render_widget(Clear, area);

    let sc = &app.shortcuts.transcription;
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Prévia da Transcrição")
        .title_style(app.theme.title())
        .title_bottom(
            Line::styled(
                format!(" Esc/{}=fechar ", format_keys(&sc.preview)),
                Style::default().fg(app.theme.dim()),
            )
            .centered(),
        );
    let text = Paragraph::new(result.preview_text.clone())
        .style(app.theme.base())
        .wrap(Wrap { trim: false })
        .block(block);
    f.render_widget(text, area);
}
