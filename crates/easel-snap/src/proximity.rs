//! Edge-to-edge proximity math for auto-snap candidate selection.

use easel_common::{Edge, Rect};

use crate::binding::AutoSnapConfig;

/// The nearest eligible candidate found during a drag update.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityMatch {
    pub target_id: String,
    pub follower_edge: Edge,
    pub target_edge: Edge,
    pub distance: f64,
}

impl ProximityMatch {
    /// Same target and edge pair; the distance may differ.
    pub fn same_pairing(&self, other: &ProximityMatch) -> bool {
        self.target_id == other.target_id
            && self.follower_edge == other.follower_edge
            && self.target_edge == other.target_edge
    }
}

/// Distance between a dragged window's edge and a target's facing edge.
///
/// Returns `None` when the edges are not opposites or the windows do not
/// overlap along the perpendicular axis (edges that cannot meet never snap).
pub fn edge_distance(
    dragged: &Rect,
    dragged_edge: Edge,
    target: &Rect,
    target_edge: Edge,
) -> Option<f64> {
    if target_edge != dragged_edge.opposite() {
        return None;
    }

    let overlap = if dragged_edge.is_horizontal() {
        dragged.horizontal_overlap(target)
    } else {
        dragged.vertical_overlap(target)
    };
    if overlap <= 0.0 {
        return None;
    }

    Some((dragged.edge(dragged_edge) - target.edge(target_edge)).abs())
}

/// A snap candidate: a window id, its current frame, and its config.
pub type Candidate = (String, Rect, AutoSnapConfig);

/// Scan candidates for the nearest accepting edge under the threshold.
///
/// Eligibility: the candidate passes the dragger's allow-list, the dragged
/// edge is in `can_snap_from`, the candidate's facing edge is in
/// `accepts_snap_on`, and the edges overlap perpendicular-wise. Equidistant
/// candidates tie-break on the lowest window id so the pick is always
/// deterministic.
pub fn find_nearest(
    dragged_frame: &Rect,
    drag_config: &AutoSnapConfig,
    candidates: &[Candidate],
) -> Option<ProximityMatch> {
    let mut best: Option<ProximityMatch> = None;

    for (target_id, target_frame, target_config) in candidates {
        if !drag_config.allows_target(target_id) {
            continue;
        }
        for dragged_edge in Edge::ALL {
            if !drag_config.can_snap_from.contains(&dragged_edge) {
                continue;
            }
            let target_edge = dragged_edge.opposite();
            if !target_config.accepts_snap_on.contains(&target_edge) {
                continue;
            }
            let Some(distance) =
                edge_distance(dragged_frame, dragged_edge, target_frame, target_edge)
            else {
                continue;
            };
            if distance >= drag_config.proximity_threshold {
                continue;
            }

            let better = match &best {
                None => true,
                Some(current) => {
                    distance < current.distance
                        || (distance == current.distance && *target_id < current.target_id)
                }
            };
            if better {
                best = Some(ProximityMatch {
                    target_id: target_id.clone(),
                    follower_edge: dragged_edge,
                    target_edge,
                    distance,
                });
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(can_snap_from: &[Edge], accepts_snap_on: &[Edge]) -> AutoSnapConfig {
        AutoSnapConfig {
            can_snap_from: can_snap_from.iter().copied().collect(),
            accepts_snap_on: accepts_snap_on.iter().copied().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn distance_requires_opposite_edges() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(0.0, 120.0, 100.0, 100.0);
        assert!(edge_distance(&a, Edge::Bottom, &b, Edge::Top).is_some());
        assert!(edge_distance(&a, Edge::Bottom, &b, Edge::Bottom).is_none());
        assert!(edge_distance(&a, Edge::Top, &b, Edge::Left).is_none());
    }

    #[test]
    fn distance_requires_perpendicular_overlap() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        // Directly below, overlapping horizontally.
        let below = Rect::new(50.0, 120.0, 100.0, 100.0);
        assert_eq!(edge_distance(&a, Edge::Bottom, &below, Edge::Top), Some(20.0));
        // Same vertical gap but fully to the side: no horizontal overlap.
        let aside = Rect::new(200.0, 120.0, 100.0, 100.0);
        assert_eq!(edge_distance(&a, Edge::Bottom, &aside, Edge::Top), None);
    }

    #[test]
    fn distance_is_absolute() {
        let a = Rect::new(0.0, 130.0, 100.0, 100.0);
        let b = Rect::new(0.0, 0.0, 100.0, 100.0);
        // a's top is 30 below b's bottom.
        assert_eq!(edge_distance(&a, Edge::Top, &b, Edge::Bottom), Some(30.0));
        // Overlapping placement still yields a distance.
        let overlapping = Rect::new(0.0, 90.0, 100.0, 100.0);
        assert_eq!(
            edge_distance(&overlapping, Edge::Top, &b, Edge::Bottom),
            Some(10.0)
        );
    }

    #[test]
    fn nearest_candidate_wins() {
        let dragged = Rect::new(0.0, 0.0, 100.0, 100.0);
        let drag_config = config(&[Edge::Bottom], &[]);
        let candidates = vec![
            (
                "far".to_string(),
                Rect::new(0.0, 140.0, 100.0, 100.0),
                config(&[], &[Edge::Top]),
            ),
            (
                "near".to_string(),
                Rect::new(0.0, 110.0, 100.0, 100.0),
                config(&[], &[Edge::Top]),
            ),
        ];
        let found = find_nearest(&dragged, &drag_config, &candidates).unwrap();
        assert_eq!(found.target_id, "near");
        assert_eq!(found.distance, 10.0);
        assert_eq!(found.follower_edge, Edge::Bottom);
        assert_eq!(found.target_edge, Edge::Top);
    }

    #[test]
    fn equidistant_candidates_tie_break_on_lowest_id() {
        let dragged = Rect::new(0.0, 0.0, 100.0, 100.0);
        let drag_config = config(&[Edge::Bottom], &[]);
        let frame = Rect::new(0.0, 120.0, 100.0, 100.0);
        let candidates = vec![
            ("zeta".to_string(), frame, config(&[], &[Edge::Top])),
            ("alpha".to_string(), frame, config(&[], &[Edge::Top])),
        ];
        let found = find_nearest(&dragged, &drag_config, &candidates).unwrap();
        assert_eq!(found.target_id, "alpha");
    }

    #[test]
    fn threshold_excludes_candidates() {
        let dragged = Rect::new(0.0, 0.0, 100.0, 100.0);
        let drag_config = config(&[Edge::Bottom], &[]);
        let candidates = vec![(
            "b".to_string(),
            Rect::new(0.0, 160.0, 100.0, 100.0),
            config(&[], &[Edge::Top]),
        )];
        // Distance 60 >= default threshold 50.
        assert!(find_nearest(&dragged, &drag_config, &candidates).is_none());
    }

    #[test]
    fn allow_list_filters_targets() {
        let dragged = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut drag_config = config(&[Edge::Bottom], &[]);
        drag_config.target_ids = Some(["allowed".to_string()].into());
        let frame = Rect::new(0.0, 110.0, 100.0, 100.0);
        let candidates = vec![
            ("denied".to_string(), frame, config(&[], &[Edge::Top])),
            ("allowed".to_string(), frame, config(&[], &[Edge::Top])),
        ];
        let found = find_nearest(&dragged, &drag_config, &candidates).unwrap();
        assert_eq!(found.target_id, "allowed");
    }

    #[test]
    fn target_must_accept_the_facing_edge() {
        let dragged = Rect::new(0.0, 0.0, 100.0, 100.0);
        let drag_config = config(&[Edge::Bottom], &[]);
        let candidates = vec![(
            "b".to_string(),
            Rect::new(0.0, 110.0, 100.0, 100.0),
            // Accepts left-edge snaps only; bottom→top pairing is refused.
            config(&[], &[Edge::Left]),
        )];
        assert!(find_nearest(&dragged, &drag_config, &candidates).is_none());
    }
}
