//! Side-by-side column layout for one day's segments.
//!
//! Segments are swept in (start, end, project id) order. Each one takes the
//! lowest column not held by a still-running segment. Segments chained
//! together by overlap form a cluster, and every member of a cluster shares
//! the cluster's column count so their widths line up.

use crate::models::calendar::{LayoutEntry, Segment};

/// Lay out the segments of a single calendar day.
///
/// The output holds one entry per input segment, in sweep order. Input order
/// does not matter: ties are broken on project id.
pub fn layout_day(mut segments: Vec<Segment>) -> Vec<LayoutEntry> {
    segments.sort_by_key(|s| (s.start_minute, s.end_minute, s.project_id));

    let mut entries: Vec<LayoutEntry> = Vec::with_capacity(segments.len());
    // (end minute, column) of segments still running at the sweep position
    let mut active: Vec<(u32, u32)> = Vec::new();
    let mut cluster_begin = 0;
    let mut cluster_end: Option<u32> = None;

    for segment in segments {
        active.retain(|(end, _)| *end > segment.start_minute);

        let mut column = 0;
        while active.iter().any(|(_, used)| *used == column) {
            column += 1;
        }
        active.push((segment.end_minute, column));

        match cluster_end {
            Some(end) if segment.start_minute < end => {
                cluster_end = Some(end.max(segment.end_minute));
            }
            _ => {
                close_cluster(&mut entries[cluster_begin..]);
                cluster_begin = entries.len();
                cluster_end = Some(segment.end_minute);
            }
        }

        entries.push(LayoutEntry {
            segment,
            column,
            columns: 1,
        });
    }
    close_cluster(&mut entries[cluster_begin..]);

    entries
}

fn close_cluster(cluster: &mut [LayoutEntry]) {
    let columns = cluster.iter().map(|e| e.column + 1).max().unwrap_or(1);
    for entry in cluster {
        entry.columns = columns;
    }
}
