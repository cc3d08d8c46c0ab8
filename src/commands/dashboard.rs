use std::collections::BTreeMap;

use crate::models::{DashboardStats, GroupSpend};
use crate::services::state::AppState;

/// Analytics are derived from the store snapshot; nothing is fetched.
pub fn get_dashboard_stats(state: &AppState) -> DashboardStats {
    let snapshot = state.store.snapshot();
    let groups = state.commodity_groups();

    let mut open_count = 0;
    let mut in_progress_count = 0;
    let mut closed_count = 0;
    let mut total_cost = 0.0;
    let mut by_group: BTreeMap<String, (String, f64)> = BTreeMap::new();

    for request in &snapshot.requests {
        match request.current_status.as_str() {
            "Open" => open_count += 1,
            "In Progress" => in_progress_count += 1,
            "Closed" => closed_count += 1,
            _ => {}
        }
        total_cost += request.total_cost;

        let entry = match (&request.commodity_group, &request.commodity_group_id) {
            (Some(group), _) => Some((group.id.clone(), group.name.clone())),
            (None, Some(id)) => {
                let name = groups
                    .iter()
                    .find(|g| &g.id == id)
                    .map(|g| g.name.clone())
                    .unwrap_or_default();
                Some((id.clone(), name))
            }
            (None, None) => None,
        };
        if let Some((id, name)) = entry {
            let slot = by_group.entry(id).or_insert((name, 0.0));
            slot.1 += request.total_cost;
        }
    }

    let mut spend_by_group: Vec<GroupSpend> = by_group
        .into_iter()
        .map(|(group_id, (group_name, total))| GroupSpend {
            group_id,
            group_name,
            total,
        })
        .collect();
    spend_by_group.sort_by(|a, b| b.total.total_cmp(&a.total));

    DashboardStats {
        total_requests: snapshot.requests.len(),
        open_count,
        in_progress_count,
        closed_count,
        total_cost,
        spend_by_group,
    }
}
