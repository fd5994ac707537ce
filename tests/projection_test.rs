use notechart::model::{Note, NoteId, NoteList};
use notechart::stage::{StageConfig, StageEntry, StageProjection};
use proptest::prelude::*;

fn note(time: f32, position: f32) -> Note {
    Note {
        time,
        position,
        ..Default::default()
    }
}

fn hold(time: f32, position: f32, duration: f32) -> Note {
    Note {
        time,
        position,
        duration,
        ..Default::default()
    }
}

fn build(notes: impl IntoIterator<Item = Note>) -> (NoteList, StageProjection, StageConfig) {
    let config = StageConfig::default();
    let list = NoteList::from_notes(notes);
    let mut projection = StageProjection::new();
    projection.rebuild(&list, &config);
    (list, projection, config)
}

fn entry_times(projection: &StageProjection, notes: &NoteList) -> Vec<f32> {
    projection
        .visible()
        .iter()
        .map(|entry| entry.time(notes))
        .collect()
}

#[test]
fn test_hold_tail_is_flushed_by_later_head() {
    let (list, projection, _) = build([hold(0.0, 0.0, 1.0), note(0.5, 0.0), note(1.2, 0.0)]);

    let kinds: Vec<bool> = projection.visible().iter().map(|e| e.is_tail()).collect();
    assert_eq!(
        kinds,
        vec![false, false, true, false],
        "Tail appears once a later head passes its end time"
    );
    assert_eq!(entry_times(&projection, &list), vec![0.0, 0.5, 1.0, 1.2]);
    assert_eq!(projection.note_count(), 3);
    assert_eq!(projection.hold_count(), 1);
    assert_eq!(projection.visible_len(), 4);

    // The tail reports its head's position and the hold's end time.
    let tail = projection.entry(2);
    assert_eq!(tail.position(&list), projection.entry(0).position(&list));
    assert_eq!(tail.time(&list), 1.0);
}

#[test]
fn test_trailing_tails_are_flushed_after_the_pass() {
    let (list, projection, _) = build([hold(0.0, 0.0, 2.0), hold(0.5, 1.0, 0.5)]);

    // Both tails are pending when input ends; they flush in ascending end
    // time order (1.0 before 2.0).
    assert_eq!(entry_times(&projection, &list), vec![0.0, 0.5, 1.0, 2.0]);
    assert_eq!(projection.hold_count(), 2);
    assert_eq!(projection.note_count(), 2);

    let tail_heads: Vec<NoteId> = projection
        .visible()
        .iter()
        .filter_map(|entry| match entry {
            StageEntry::Tail(tail) => Some(tail.head),
            StageEntry::Head(_) => None,
        })
        .collect();
    let ids: Vec<NoteId> = list.ids().collect();
    assert_eq!(tail_heads, vec![ids[1], ids[0]]);
}

#[test]
fn test_off_stage_note_lands_in_background_only() {
    let (list, projection, _) = build([note(0.0, 3.0), note(0.5, 0.0)]);

    assert_eq!(projection.background().len(), 1);
    assert_eq!(projection.visible_len(), 1);
    let background_note = &list[projection.background()[0]];
    assert_eq!(background_note.position, 3.0);
}

#[test]
fn test_background_notes_do_not_flush_tails() {
    // The hold ends before the background note's time, but only a visible
    // head may flush it.
    let (list, projection, _) = build([hold(0.0, 0.0, 0.2), note(0.5, 3.0), note(1.0, 0.0)]);

    assert_eq!(entry_times(&projection, &list), vec![0.0, 0.2, 1.0]);
    assert_eq!(projection.background().len(), 1);
}

#[test]
fn test_swipe_with_duration_gets_no_tail() {
    let (_, projection, _) = build([Note {
        time: 0.0,
        duration: 0.4,
        is_swipe: true,
        ..Default::default()
    }]);

    assert_eq!(projection.hold_count(), 0);
    assert_eq!(projection.visible_len(), 1);
}

#[test]
fn test_search_disambiguates_equal_times_by_identity() {
    let (list, projection, _) = build([
        note(0.5, -1.0),
        note(0.5, 0.0),
        note(0.5, 1.0),
        note(1.0, 0.0),
    ]);

    for (index, entry) in projection.visible().iter().enumerate() {
        let head = entry.as_head().unwrap();
        assert_eq!(
            projection.search(&list, head.note),
            Ok(index),
            "Search must find the exact entry even among equal times"
        );
    }
}

#[test]
fn test_search_misses_background_note() {
    let (list, projection, _) = build([note(0.0, 0.0), note(0.5, 3.0), note(1.0, 0.0)]);

    let background_id = projection.background()[0];
    assert!(projection.search(&list, background_id).is_err());
}

#[test]
fn test_tail_of_finds_matching_tail() {
    let (list, projection, _) = build([hold(0.0, 0.0, 1.0), note(0.5, 1.0), note(1.2, 0.0)]);

    let tail_index = projection.tail_of(&list, 0).unwrap();
    assert_eq!(tail_index, 2);
    match projection.entry(tail_index) {
        StageEntry::Tail(tail) => {
            let head = projection.entry(0).as_head().unwrap();
            assert_eq!(tail.head, head.note);
        }
        StageEntry::Head(_) => panic!("expected a tail entry"),
    }

    // A non-hold head has no tail.
    assert_eq!(projection.tail_of(&list, 1), None);

    let hold_id = list.ids().next().unwrap();
    assert_eq!(projection.tail_of_note(&list, hold_id), Some(2));
}

#[test]
fn test_collided_neighbors_within_thresholds() {
    let (list, projection, config) = build([
        note(0.4995, 0.0),
        note(0.5, 0.005),
        note(0.5005, 1.5),
        note(0.8, 0.005),
    ]);

    let ids: Vec<NoteId> = list.ids().collect();
    let collided = projection.collided_neighbors(&list, &config, 1);
    // The far-away position (1.5) and the out-of-window time (0.8) are both
    // excluded.
    assert_eq!(collided, vec![ids[0]]);
}

#[test]
fn test_collision_scan_skips_tails_and_stops_at_time_window() {
    let (list, projection, config) = build([
        hold(0.0, 0.0, 1.0),
        note(0.9985, 0.005),
        note(0.999, 0.0),
        note(2.0, 0.0),
    ]);

    // Visible sequence: head(0.0) head(0.9985) head(0.999) tail(1.0) head(2.0).
    let index = {
        let ids: Vec<NoteId> = list.ids().collect();
        projection.search(&list, ids[2]).unwrap()
    };
    let collided = projection.collided_neighbors(&list, &config, index);

    let ids: Vec<NoteId> = list.ids().collect();
    assert!(collided.contains(&ids[1]));
    assert!(
        !collided.contains(&ids[0]),
        "Scan stops at the first head outside the time window"
    );
    assert!(!collided.contains(&ids[3]));
}

#[test]
fn test_collision_predicate_is_symmetric() {
    let (list, projection, config) = build([note(0.5, 0.0), note(0.5005, 0.005)]);

    let ids: Vec<NoteId> = list.ids().collect();
    let from_first = projection.collided_neighbors(&list, &config, 0);
    let from_second = projection.collided_neighbors(&list, &config, 1);
    assert_eq!(from_first, vec![ids[1]]);
    assert_eq!(from_second, vec![ids[0]]);
}

#[test]
fn test_merge_interleaves_and_prefers_visible_on_ties() {
    let (list, projection, _) = build([
        note(0.0, 3.0),
        note(0.5, 0.0),
        note(0.5, -3.0),
        hold(1.0, 0.0, 0.5),
    ]);

    let merged = projection.merged_notes(&list);
    let times: Vec<f32> = merged.iter().map(|n| n.time).collect();
    assert_eq!(times, vec![0.0, 0.5, 0.5, 1.0]);
    // At t=0.5 the visible note comes before the background one.
    assert_eq!(merged[1].position, 0.0);
    assert_eq!(merged[2].position, -3.0);
}

#[test]
fn test_merge_zeroes_swipe_duration_and_drops_links() {
    let mut list = NoteList::from_notes([
        Note {
            time: 0.0,
            duration: 0.4,
            is_swipe: true,
            ..Default::default()
        },
        note(0.5, 0.0),
    ]);
    let ids: Vec<NoteId> = list.ids().collect();
    list.link(ids[0], ids[1]);

    let config = StageConfig::default();
    let mut projection = StageProjection::new();
    projection.rebuild(&list, &config);

    let merged = projection.merged_notes(&list);
    assert_eq!(merged[0].duration, 0.0, "Swipe duration is zeroed on merge");
    assert!(merged[0].is_swipe);
    assert!(merged.iter().all(|n| !n.is_linked()));
    // The in-memory list is untouched.
    assert_eq!(list[ids[0]].duration, 0.4);
    assert!(list[ids[0]].is_linked());
}

#[test]
fn test_selection_state_xors_with_selection_range() {
    let (_, mut projection, _) = build([note(0.0, 0.0)]);

    let head = projection.entry_mut(0).as_head_mut().unwrap();
    assert!(!head.is_selected());
    head.set_in_selection(true);
    assert!(head.is_selected());
    head.set_selected(true);
    assert!(head.is_selected(), "Committing selection clears the range flag");
    head.set_in_selection(true);
    assert!(!head.is_selected(), "Range toggles committed selection");
}

#[test]
fn test_rebuild_reflects_edits_to_the_flat_list() {
    let config = StageConfig::default();
    let mut list = NoteList::from_notes([note(0.0, 0.0), note(1.0, 0.0)]);
    let mut projection = StageProjection::new();
    projection.rebuild(&list, &config);
    assert_eq!(projection.visible_len(), 2);

    // The editor mutates the flat list, then refreshes the derived views.
    let second = list.ids().nth(1).unwrap();
    list.get_mut(second).unwrap().position = 3.0;
    projection.rebuild(&list, &config);

    assert_eq!(projection.visible_len(), 1);
    assert_eq!(projection.background(), &[second]);
}

#[test]
fn test_collision_counter_marks_heads_collided() {
    let (list, mut projection, config) = build([note(0.5, 0.0), note(0.5005, 0.005)]);

    let collided = projection.collided_neighbors(&list, &config, 0);
    let head = projection.entry_mut(0).as_head_mut().unwrap();
    assert!(!head.is_collided());
    head.collision_count += collided.len() as i32;
    assert!(head.is_collided());
}

proptest! {
    #[test]
    fn prop_projection_sequences_stay_time_ordered(
        mut raw in prop::collection::vec(
            (0.0f32..30.0, -4.0f32..4.0, 0.0f32..3.0, any::<bool>()),
            0..64,
        )
    ) {
        raw.sort_by(|a, b| a.0.total_cmp(&b.0));
        let list = NoteList::from_notes(raw.iter().map(|&(time, position, duration, is_swipe)| Note {
            time,
            position,
            duration,
            is_swipe,
            ..Default::default()
        }));

        let config = StageConfig::default();
        let mut projection = StageProjection::new();
        projection.rebuild(&list, &config);

        let times = entry_times(&projection, &list);
        prop_assert!(times.windows(2).all(|pair| pair[0] <= pair[1]));

        let background_times: Vec<f32> = projection
            .background()
            .iter()
            .map(|&id| list[id].time)
            .collect();
        prop_assert!(background_times.windows(2).all(|pair| pair[0] <= pair[1]));

        // Counts: every note lands in exactly one sequence, and tails match
        // holds one-to-one.
        let head_count = projection.heads().count();
        prop_assert_eq!(head_count + projection.background().len(), list.len());
        prop_assert_eq!(projection.note_count(), head_count);
        let hold_heads = projection
            .heads()
            .filter(|head| list[head.note].is_hold())
            .count();
        prop_assert_eq!(projection.hold_count(), hold_heads);
        prop_assert_eq!(
            projection.note_count(),
            projection.visible_len() - projection.hold_count()
        );

        // Search finds every visible head by identity.
        for (index, entry) in projection.visible().iter().enumerate() {
            if let Some(head) = entry.as_head() {
                prop_assert_eq!(projection.search(&list, head.note), Ok(index));
            }
        }

        // The merge reconstructs a time-ordered flat list of the same length.
        let merged = projection.merged_notes(&list);
        prop_assert_eq!(merged.len(), list.len());
        prop_assert!(merged.windows(2).all(|pair| pair[0].time <= pair[1].time));
    }
}
