//! Property tests for classification, rotation and log serialization

use proptest::prelude::*;
use urlpoll::models::{LogStructure, Status};
use urlpoll::queue::{Rotation, WorkQueue};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn prop_classification_matches_band(code in 0u16..1000) {
        let expected = if (200..=226).contains(&code) { Status::Up } else { Status::Down };
        prop_assert_eq!(Status::from_code(code), expected);
    }

    #[test]
    fn prop_rotation_preserves_length_and_entries(
        urls in prop::collection::vec(prop_oneof![Just(String::new()), "[a-z]{1,8}"], 1..12),
        rotations in 0usize..40,
    ) {
        let rt = runtime();
        rt.block_on(async {
            let queue = WorkQueue::new(urls.clone());
            let mut processed = 0usize;
            let mut skipped = 0usize;

            for _ in 0..rotations {
                match queue.rotate_and_process(|_| async {}).await.unwrap() {
                    Rotation::Processed => processed += 1,
                    Rotation::Skipped => skipped += 1,
                }
                assert_eq!(queue.len().await, urls.len());
            }

            assert_eq!(processed + skipped, rotations);

            let mut before = urls.clone();
            let mut after = queue.snapshot().await;
            before.sort();
            after.sort();
            assert_eq!(before, after);

            // The queue is the original list rotated left
            let shift = rotations % urls.len();
            let mut expected = urls.clone();
            expected.rotate_left(shift);
            assert_eq!(queue.snapshot().await, expected);
        });
    }

    #[test]
    fn prop_blank_entries_never_processed(
        urls in prop::collection::vec(prop_oneof![Just(String::new()), Just("  ".to_string()), "[a-z]{1,8}"], 1..12),
    ) {
        let rt = runtime();
        rt.block_on(async {
            let queue = WorkQueue::new(urls.clone());
            let seen = std::sync::Mutex::new(Vec::new());
            let seen_ref = &seen;

            // Two full cycles
            for _ in 0..urls.len() * 2 {
                queue
                    .rotate_and_process(move |url| async move {
                        seen_ref.lock().unwrap().push(url);
                    })
                    .await
                    .unwrap();
            }

            let seen = seen.into_inner().unwrap();
            let non_blank = urls.iter().filter(|u| !u.trim().is_empty()).count();
            assert_eq!(seen.len(), non_blank * 2);
            assert!(seen.iter().all(|u| !u.trim().is_empty()));
        });
    }

    #[test]
    fn prop_log_structure_round_trip(logs in prop::collection::vec(".*", 0..16)) {
        let structure = LogStructure { logs };
        let bytes = structure.to_json_pretty().unwrap();
        prop_assert_eq!(LogStructure::from_json(&bytes).unwrap(), structure);
    }
}
