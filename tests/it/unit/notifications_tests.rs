//! Unit tests for notifications module.

use mentorboard::notifications::{Toast, ToastManager, ToastVariant};

#[test]
fn test_toast_creation() {
    let toast = Toast::success("Text copied to clipboard!");
    assert_eq!(toast.message, "Text copied to clipboard!");
    assert_eq!(toast.variant, ToastVariant::Success);
    assert_eq!(Toast::warning("Careful").variant, ToastVariant::Warning);
}

#[test]
fn test_toast_manager() {
    let mut manager = ToastManager::new();
    assert_eq!(manager.count(), 0);
    assert!(manager.latest().is_none());

    manager.push(Toast::success("Message 1"));
    manager.push(Toast::error("Message 2"));
    assert_eq!(manager.count(), 2);
    assert_eq!(manager.latest().map(|t| t.message.as_str()), Some("Message 2"));

    let dismissed = manager.dismiss().unwrap();
    assert_eq!(dismissed.message, "Message 1");

    manager.clear();
    assert_eq!(manager.count(), 0);
}

#[test]
fn test_oldest_toast_drops_when_full() {
    let mut manager = ToastManager::new();
    for i in 0..8 {
        manager.push(Toast::info(format!("Toast {}", i)));
    }
    let messages: Vec<_> = manager.iter().map(|t| t.message.as_str()).collect();
    assert_eq!(messages, vec!["Toast 3", "Toast 4", "Toast 5", "Toast 6", "Toast 7"]);
}
