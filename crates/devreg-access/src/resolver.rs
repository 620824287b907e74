//! Resolution of requesters to the content pointers they may access.

use std::fmt;

use devreg_core::{ContentPointer, DeviceAsset};

use crate::observer::ResolutionObserver;

/// Who is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requester<'a> {
    /// A device, by device id.
    Device(&'a str),
    /// A user, by email.
    User(&'a str),
}

impl Requester<'_> {
    /// Whether `asset`'s access lists admit this requester.
    pub fn is_authorized_by(&self, asset: &DeviceAsset) -> bool {
        match self {
            Requester::Device(id) => asset.authorizes_device(id),
            Requester::User(email) => asset.authorizes_user(email),
        }
    }
}

impl fmt::Display for Requester<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requester::Device(id) => write!(f, "device:{}", id),
            Requester::User(email) => write!(f, "user:{}", email),
        }
    }
}

/// The content pointer a device may access.
///
/// When several assets authorize the device, the last one in scan order
/// wins. `None` means no asset authorizes it.
pub fn resolve_by_device<'a>(
    device_id: &str,
    assets: &'a [DeviceAsset],
    observer: &dyn ResolutionObserver,
) -> Option<&'a ContentPointer> {
    matching(Requester::Device(device_id), assets, observer).pop()
}

/// Every content pointer a device may access, in scan order.
pub fn resolve_all_by_device<'a>(
    device_id: &str,
    assets: &'a [DeviceAsset],
    observer: &dyn ResolutionObserver,
) -> Vec<&'a ContentPointer> {
    matching(Requester::Device(device_id), assets, observer)
}

/// Every content pointer a user may access, in scan order.
///
/// An empty result means no match, not an error.
pub fn resolve_by_user<'a>(
    email: &str,
    assets: &'a [DeviceAsset],
    observer: &dyn ResolutionObserver,
) -> Vec<&'a ContentPointer> {
    matching(Requester::User(email), assets, observer)
}

/// The content pointer of a single asset, if it admits `requester`.
pub fn access_to<'a>(
    requester: Requester<'_>,
    asset: &'a DeviceAsset,
    observer: &dyn ResolutionObserver,
) -> Option<&'a ContentPointer> {
    matching(requester, std::slice::from_ref(asset), observer).pop()
}

fn matching<'a>(
    requester: Requester<'_>,
    assets: &'a [DeviceAsset],
    observer: &dyn ResolutionObserver,
) -> Vec<&'a ContentPointer> {
    if assets.is_empty() {
        observer.on_empty_assets(&requester);
        return Vec::new();
    }

    let mut pointers = Vec::new();
    for asset in assets {
        if requester.is_authorized_by(asset) {
            observer.on_match(&requester, &asset.id, &asset.content_pointer);
            pointers.push(&asset.content_pointer);
        }
    }

    if pointers.is_empty() {
        observer.on_no_match(&requester, assets.len());
    }
    pointers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;
    use devreg_core::DeviceId;
    use proptest::prelude::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<String>>,
    }

    impl ResolutionObserver for Recorder {
        fn on_empty_assets(&self, requester: &Requester<'_>) {
            self.events.borrow_mut().push(format!("empty {}", requester));
        }

        fn on_match(&self, requester: &Requester<'_>, asset: &DeviceId, _: &ContentPointer) {
            self.events
                .borrow_mut()
                .push(format!("match {} {}", requester, asset));
        }

        fn on_no_match(&self, requester: &Requester<'_>, scanned: usize) {
            self.events
                .borrow_mut()
                .push(format!("none {} {}", requester, scanned));
        }
    }

    fn asset(id: &str, pointer: &str) -> DeviceAsset {
        DeviceAsset::new(DeviceId::new(id).unwrap(), "owner").with_content_pointer(pointer)
    }

    #[test]
    fn test_device_match() {
        let assets = vec![asset("d1", "h1").with_authorized_devices(["d2", "d3"])];

        assert_eq!(
            resolve_by_device("d2", &assets, &NoopObserver),
            Some(&ContentPointer::from("h1"))
        );
        assert_eq!(resolve_by_device("d9", &assets, &NoopObserver), None);
    }

    #[test]
    fn test_device_last_match_wins() {
        let assets = vec![
            asset("d1", "h1").with_authorized_devices(["d2"]),
            asset("d4", "h4").with_authorized_devices(["d3"]),
            asset("d5", "h5").with_authorized_devices(["d2"]),
        ];

        assert_eq!(
            resolve_by_device("d2", &assets, &NoopObserver).map(|p| p.as_str()),
            Some("h5")
        );
        let all: Vec<&str> = resolve_all_by_device("d2", &assets, &NoopObserver)
            .into_iter()
            .map(|p| p.as_str())
            .collect();
        assert_eq!(all, vec!["h1", "h5"]);
    }

    #[test]
    fn test_user_accumulates_in_scan_order() {
        let assets = vec![
            asset("d1", "h1").with_authorized_users(["a@x.com"]),
            asset("d2", "h2").with_authorized_users(["a@x.com"]),
        ];

        let pointers: Vec<&str> = resolve_by_user("a@x.com", &assets, &NoopObserver)
            .into_iter()
            .map(|p| p.as_str())
            .collect();
        assert_eq!(pointers, vec!["h1", "h2"]);
        assert!(resolve_by_user("nobody@x.com", &assets, &NoopObserver).is_empty());
    }

    #[test]
    fn test_device_and_user_lists_are_separate() {
        let assets = vec![asset("d1", "h1").with_authorized_users(["d2"])];
        assert_eq!(resolve_by_device("d2", &assets, &NoopObserver), None);
    }

    #[test]
    fn test_empty_assets_reported() {
        let recorder = Recorder::default();
        assert_eq!(resolve_by_device("d2", &[], &recorder), None);
        assert!(resolve_by_user("a@x.com", &[], &recorder).is_empty());

        assert_eq!(
            *recorder.events.borrow(),
            vec!["empty device:d2", "empty user:a@x.com"]
        );
    }

    #[test]
    fn test_observer_sees_matches_and_misses() {
        let recorder = Recorder::default();
        let assets = vec![
            asset("d1", "h1").with_authorized_devices(["d2"]),
            asset("d3", "h3"),
        ];

        resolve_by_device("d2", &assets, &recorder);
        resolve_by_device("d7", &assets, &recorder);

        assert_eq!(
            *recorder.events.borrow(),
            vec!["match device:d2 d1", "none device:d7 2"]
        );
    }

    #[test]
    fn test_single_target_access() {
        let target = asset("d1", "h1")
            .with_authorized_devices(["d2"])
            .with_authorized_users(["a@x.com"]);

        assert!(access_to(Requester::Device("d2"), &target, &NoopObserver).is_some());
        assert!(access_to(Requester::User("a@x.com"), &target, &NoopObserver).is_some());
        assert!(access_to(Requester::User("b@x.com"), &target, &NoopObserver).is_none());
    }

    proptest! {
        #[test]
        fn test_last_match_is_tail_of_all_matches(
            acls in prop::collection::vec(prop::collection::vec(0u8..4, 0..4), 0..8),
            requester in 0u8..4,
        ) {
            let assets: Vec<DeviceAsset> = acls
                .iter()
                .enumerate()
                .map(|(i, acl)| {
                    asset(&format!("d{}", i), &format!("h{}", i))
                        .with_authorized_devices(acl.iter().map(|d| format!("r{}", d)))
                })
                .collect();
            let name = format!("r{}", requester);

            let all = resolve_all_by_device(&name, &assets, &NoopObserver);
            prop_assert_eq!(
                resolve_by_device(&name, &assets, &NoopObserver),
                all.last().copied()
            );
        }
    }

    #[test]
    fn test_pure_over_inputs() {
        let assets = vec![asset("d1", "h1").with_authorized_devices(["d2"])];
        let first = resolve_by_device("d2", &assets, &NoopObserver).cloned();
        let second = resolve_by_device("d2", &assets, &NoopObserver).cloned();
        assert_eq!(first, second);
    }
}
