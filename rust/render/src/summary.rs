// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plain-text summary of a match

use planrec_core::PlanMatch;

/// Human-readable description of the selected plan
pub fn format_summary(found: &PlanMatch<'_>) -> String {
    let plan = found.plan;
    let mut out = format!(
        "Selected Plan: {}\nPlot Size: {}m × {}m\nMatch Distance: {:.2}\n\nRooms in this plan:\n",
        plan.plan_id, plan.plot_width, plan.plot_height, found.distance
    );
    for room in &plan.rooms {
        out.push_str(&format!("   • {}\n", room.label));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use planrec_core::{PlanRecord, Room, RoomRect, Uiiv};

    #[test]
    fn test_summary() {
        let plan = PlanRecord {
            plan_id: "PLAN_002".into(),
            plot_width: 10.0,
            plot_height: 15.5,
            uiiv: Uiiv::from([10.0, 15.5, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]),
            rooms: vec![
                Room {
                    label: "Parking".into(),
                    rect: RoomRect::new(0.0, 0.0, 4.0, 5.0),
                },
                Room {
                    label: "Bedroom 1".into(),
                    rect: RoomRect::new(0.0, 5.0, 4.0, 5.0),
                },
            ],
        };
        let found = PlanMatch {
            index: 1,
            plan: &plan,
            distance: std::f64::consts::SQRT_2,
            group: None,
            candidates: 2,
        };

        let text = format_summary(&found);
        assert_eq!(
            text,
            "Selected Plan: PLAN_002\n\
             Plot Size: 10m × 15.5m\n\
             Match Distance: 1.41\n\
             \n\
             Rooms in this plan:\n   \
             • Parking\n   \
             • Bedroom 1\n"
        );
    }
}
