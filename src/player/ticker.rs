use std::time::{Duration, Instant};

/// 스토어가 소유하는 단일 주기 타이머.
///
/// 새로 걸면 이전 일정은 사라지므로 폴링 시각은 항상 하나뿐이다.
/// 소유자가 [`Ticker::fire`]를 불러 구동한다.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    deadline: Option<Instant>,
    generation: u64,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: None,
            generation: 0,
        }
    }

    /// 현재 일정을 취소하고 `now`부터 새로 건다.
    pub fn arm(&mut self, now: Instant) {
        self.generation += 1;
        self.deadline = Some(now + self.period);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// [`Ticker::arm`]을 부를 때마다 1씩 늘어난다.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// 예정 시각이 지났으면 true를 돌려주고 다음 시각을 잡는다.
    /// 놓친 주기는 한 번으로 합친다.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = Some(now + self.period);
                true
            }
            _ => false,
        }
    }
}
