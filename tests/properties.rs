mod common;
use crate::common::owned;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use proptest::prelude::*;

use composer_bridge::client::{NO_ANSI, NO_PROGRESS, Operation, rewrite_args};
use composer_bridge::lifecycle::{Disposable, DisposableSet, to_disposable};

fn arg() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("install".to_string()),
        Just("update".to_string()),
        Just("require".to_string()),
        Just("--dev".to_string()),
        "[a-z/-]{1,12}",
    ]
}

proptest! {
    #[test]
    fn rewrite_keeps_caller_args_as_suffix(args in proptest::collection::vec(arg(), 0..6)) {
        let rewritten = rewrite_args(&args);

        prop_assert_eq!(rewritten[0].as_str(), NO_ANSI);
        prop_assert!(rewritten.ends_with(&args));

        let wants_progress_flag = matches!(args.first().map(String::as_str), Some("install" | "update"));
        let extra = if wants_progress_flag { 2 } else { 1 };
        prop_assert_eq!(rewritten.len(), args.len() + extra);
        if wants_progress_flag {
            prop_assert_eq!(rewritten[1].as_str(), NO_PROGRESS);
        }
    }

    #[test]
    fn command_line_starts_with_prefix(index in 0..Operation::ALL.len(), args in proptest::collection::vec(arg(), 0..4)) {
        let op = Operation::ALL[index];
        let line = op.command_line(&args);

        let prefix = owned(op.prefix());
        let (head, tail) = line.split_at(prefix.len());

        prop_assert_eq!(head, &prefix[..]);
        prop_assert_eq!(tail, &args[..]);
    }

    #[test]
    fn every_member_is_released_exactly_once(members in 0usize..16, releases in 1usize..4) {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut set = DisposableSet::new();
        for _ in 0..members {
            let counter = Arc::clone(&counter);
            set.push(to_disposable(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }

        for _ in 0..releases {
            prop_assert!(set.release().is_ok());
        }
        drop(set);

        prop_assert_eq!(counter.load(Ordering::SeqCst), members);
    }
}
