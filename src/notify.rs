use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for NotifyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NotifyKind::Info => "알림",
            NotifyKind::Success => "완료",
            NotifyKind::Warning => "경고",
            NotifyKind::Error => "오류",
        };
        f.write_str(label)
    }
}

/// 사용자에게 짧은 메시지를 보여주는 수단.
/// 보내고 끝이며, 실패해도 호출자에게 알리지 않는다.
pub trait Notifier {
    fn notify(&self, message: &str, kind: NotifyKind);
}

/// 표준 에러 출력으로 알림을 내보낸다.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, kind: NotifyKind) {
        tracing::debug!(%kind, "{}", message);
        eprintln!("[{}] {}", kind, message);
    }
}
