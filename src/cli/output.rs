//! Output formatting for CLI commands

use serde::Serialize;
use tokio::time::Instant;

use crate::notification::{countdown_secs, IgnoreReason, RowPhase};
use crate::session::Session;

/// Format output as pretty JSON
pub fn format_output<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
}

/// Action column for one row, e.g. `Notificar`, `Esperando (42s)`
pub fn action_label(session: &Session, row: usize, now: Instant) -> String {
    match session.state(row).phase() {
        RowPhase::Cooling | RowPhase::Ready => "Notificado".to_string(),
        RowPhase::Idle => match session.board().remaining(now).map(countdown_secs) {
            Some(secs) if secs > 0 => format!("Esperando ({}s)", secs),
            _ => "Notificar".to_string(),
        },
    }
}

/// User-facing text for a refused notify
pub fn reason_label(reason: IgnoreReason) -> &'static str {
    match reason {
        IgnoreReason::UnknownRow => "fila inexistente",
        IgnoreReason::AlreadySent => "ya fue notificada",
        IgnoreReason::CoolingDown => "esperando fin de la pausa",
    }
}

/// Plain-text table of the loaded rows with their notify status
pub fn render_rows(session: &Session, now: Instant) -> String {
    let rows = session.rows();
    if rows.is_empty() {
        return "No hay paquetes cargados".to_string();
    }

    let mut out = format!(
        "{:>3}  {:<10} {:<14} {:<18} {:<15} {:<26} {:<6} {:<12} {}\n",
        "#",
        "Código",
        "Cliente",
        "Destinatario",
        "Teléfono",
        "Dirección",
        "Visita",
        "Estado",
        "Acción"
    );
    for (index, row) in rows.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}  {:<10} {:<14} {:<18} {:<15} {:<26} {:<6} {:<12} {}\n",
            index + 1,
            truncate(&row.code, 10),
            truncate(&row.client, 14),
            truncate(&row.recipient, 18),
            truncate(&row.phone, 15),
            truncate(&row.address, 26),
            truncate(&row.estimated_visit_time, 6),
            truncate(&row.status, 12),
            action_label(session, index, now),
        ));
    }
    out
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
