use peerdesk_shared::models::DeliveryKind;
use peerdesk_shared::{config, db};

pub fn run_list(limit: i64) -> Result<(), String> {
    let db_path = config::db_path();
    if !db_path.exists() {
        println!("No deliveries.");
        return Ok(());
    }

    let conn =
        db::open_reader(&db_path).map_err(|e| format!("Failed to open journal: {}", e))?;
    let deliveries =
        db::list(&conn, limit).map_err(|e| format!("Failed to list deliveries: {}", e))?;

    if deliveries.is_empty() {
        println!("No deliveries.");
        return Ok(());
    }
    for d in &deliveries {
        let kind = match d.kind.parse::<DeliveryKind>() {
            Ok(kind) => kind,
            Err(e) => {
                log::warn!("Skipping journal row {}: {}", d.id, e);
                continue;
            }
        };
        let id_str = if d.notification_id.is_empty() {
            String::new()
        } else {
            format!(" (id:{})", d.notification_id)
        };
        let target = if d.path.is_empty() {
            d.screen.clone()
        } else {
            format!("{} -> {} {}", d.screen, d.path, d.detail)
        };
        println!("[{}] {} {:<10} {}{}", d.id, d.created_at, kind, target, id_str);
        if kind == DeliveryKind::Dropped && !d.detail.is_empty() {
            println!("      {}", d.detail);
        }
    }
    Ok(())
}

pub fn run_clear() -> Result<(), String> {
    let db_path = config::db_path();
    if db_path.exists() {
        let conn =
            db::open_reader(&db_path).map_err(|e| format!("Failed to open journal: {}", e))?;
        db::clear(&conn).map_err(|e| format!("Failed to clear journal: {}", e))?;
    }
    println!("Journal cleared.");
    Ok(())
}
