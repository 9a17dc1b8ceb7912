// ==================== DASHBOARD AGGREGATION ====================
// Agregação read-side por host: busca os eventos e faz uma contagem de
// inscrições por evento. Sem cache e sem paginação — o custo é linear em
// (eventos × um round trip de count cada).

use crate::{database::MongoDB, models::Event};
use futures::stream::StreamExt;
use mongodb::bson::doc;
use serde::Serialize;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct EventStat {
    pub event_id: String,
    pub title: String,
    pub start_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub registration_count: u64,
    pub revenue: f64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DashboardResponse {
    pub success: bool,
    pub total_events: usize,
    pub total_attendees: u64,
    pub upcoming_events: usize,
    pub total_revenue: f64,
    pub events: Vec<EventStat>,
}

/// Totais derivados a partir das linhas por evento.
/// Receita = preço × inscrições; eventos gratuitos contribuem 0.
pub fn compute_totals(now_ms: i64, stats: &[EventStat]) -> (u64, usize, f64) {
    let total_attendees = stats.iter().map(|s| s.registration_count).sum();
    let upcoming_events = stats.iter().filter(|s| s.start_at > now_ms).count();
    let total_revenue = stats.iter().map(|s| s.revenue).sum();
    (total_attendees, upcoming_events, total_revenue)
}

pub fn event_revenue(price: Option<f64>, registration_count: u64) -> f64 {
    price.unwrap_or(0.0) * registration_count as f64
}

pub async fn get_dashboard(db: &MongoDB, host_id: &str) -> Result<DashboardResponse, String> {
    log::info!("📊 Building dashboard for host {}", host_id);

    let events_collection = db.collection::<Event>("events");
    let registrations_collection = db.collection::<mongodb::bson::Document>("registrations");

    let mut cursor = events_collection
        .find(doc! { "host_id": host_id })
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    let mut stats = Vec::new();

    while let Some(result) = cursor.next().await {
        let event = match result {
            Ok(event) => event,
            Err(e) => {
                log::error!("❌ Error reading event: {}", e);
                continue;
            }
        };

        let event_id = event.id.map(|id| id.to_hex()).unwrap_or_default();

        // Um count query por evento
        let registration_count = registrations_collection
            .count_documents(doc! { "event_id": &event_id })
            .await
            .map_err(|e| format!("Failed to count registrations: {}", e))?;

        stats.push(EventStat {
            revenue: event_revenue(event.price, registration_count),
            event_id,
            title: event.title,
            start_at: event.start_at,
            price: event.price,
            registration_count,
        });
    }

    // Mais próximos primeiro
    stats.sort_by(|a, b| a.start_at.cmp(&b.start_at));

    let now = chrono::Utc::now().timestamp_millis();
    let (total_attendees, upcoming_events, total_revenue) = compute_totals(now, &stats);

    log::info!(
        "✅ Dashboard for host {}: {} events, {} attendees, ${:.2} revenue",
        host_id,
        stats.len(),
        total_attendees,
        total_revenue
    );

    Ok(DashboardResponse {
        success: true,
        total_events: stats.len(),
        total_attendees,
        upcoming_events,
        total_revenue,
        events: stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(start_at: i64, price: Option<f64>, count: u64) -> EventStat {
        EventStat {
            event_id: "e".to_string(),
            title: "Event".to_string(),
            start_at,
            price,
            registration_count: count,
            revenue: event_revenue(price, count),
        }
    }

    #[test]
    fn test_totals_for_mixed_pricing() {
        // Contagens {5, 0, 3} com preços {$10, grátis, $20}
        let now = 1_000;
        let stats = vec![
            stat(2_000, Some(10.0), 5),
            stat(500, None, 0),
            stat(3_000, Some(20.0), 3),
        ];

        let (attendees, upcoming, revenue) = compute_totals(now, &stats);
        assert_eq!(attendees, 8);
        assert_eq!(upcoming, 2);
        assert!((revenue - 110.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_free_event_contributes_zero_revenue() {
        assert_eq!(event_revenue(None, 50), 0.0);
        assert_eq!(event_revenue(Some(0.0), 50), 0.0);
        assert_eq!(event_revenue(Some(12.5), 4), 50.0);
    }

    #[test]
    fn test_upcoming_compares_start_to_now() {
        let now = 1_000;
        let stats = vec![stat(1_000, None, 0), stat(1_001, None, 0)];
        let (_, upcoming, _) = compute_totals(now, &stats);
        // start_at == now não é "upcoming"
        assert_eq!(upcoming, 1);
    }
}
