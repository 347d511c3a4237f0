//! Unit tests for bp-core primitives.

#[cfg(test)]
mod handle {
    use crate::ModuleHandle;

    #[test]
    fn slot_cast() {
        let h = ModuleHandle::new(42, 3);
        assert_eq!(h.slot(), 42);
    }

    #[test]
    fn invalid_sentinel_is_max() {
        assert_eq!(ModuleHandle::INVALID.index, u32::MAX);
        assert_eq!(ModuleHandle::INVALID.generation, u32::MAX);
        assert_eq!(ModuleHandle::default(), ModuleHandle::INVALID);
    }

    #[test]
    fn generation_distinguishes_reused_slots() {
        let old = ModuleHandle::new(0, 1);
        let new = ModuleHandle::new(0, 2);
        assert_ne!(old, new);
    }

    #[test]
    fn display() {
        assert_eq!(ModuleHandle::new(7, 2).to_string(), "ModuleHandle(7@g2)");
    }
}

#[cfg(test)]
mod pose {
    use crate::Pose;

    #[test]
    fn zero_distance() {
        let p = Pose::new(10.0, -4.0, 0.2, 1.57);
        assert_eq!(p.distance_xy(p), 0.0);
    }

    #[test]
    fn planar_distance_ignores_z() {
        let a = Pose::new(0.0, 0.0, 0.0, 0.0);
        let b = Pose::new(3.0, 4.0, 25.0, 0.0);
        assert!((a.distance_xy(b) - 5.0).abs() < 1e-12);
    }
}

#[cfg(test)]
mod time {
    use crate::Timestamp;

    #[test]
    fn construction_roundtrip() {
        assert_eq!(Timestamp::from_secs(5), Timestamp(5_000_000_000));
        assert_eq!(Timestamp::from_millis(1_500), Timestamp(1_500_000_000));
        assert_eq!(Timestamp::from_secs(5).as_secs(), 5);
    }

    #[test]
    fn saturating_since_clamps() {
        let early = Timestamp::from_secs(1);
        let late = Timestamp::from_secs(3);
        assert_eq!(late.saturating_since(early), 2_000_000_000);
        assert_eq!(early.saturating_since(late), 0);
    }

    #[test]
    fn display() {
        assert_eq!(Timestamp::from_millis(1_250).to_string(), "1.250000000s");
    }
}

#[cfg(test)]
mod reporter {
    use std::sync::mpsc;

    use crate::ProcessingTimeRecord;

    #[test]
    fn disconnected_receiver_is_silent() {
        let (tx, rx) = mpsc::channel::<ProcessingTimeRecord>();
        drop(rx);
        // Fire-and-forget: the send error is the caller's to ignore.
        let result = tx.send(ProcessingTimeRecord {
            module: "lane_change".into(),
            elapsed_us: 120,
        });
        assert!(result.is_err());
    }
}
