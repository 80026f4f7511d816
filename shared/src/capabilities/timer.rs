//! One-shot timers resolved by the shell.
//!
//! Every request carries a [`TimerToken`]. The core remembers which token it
//! expects for each purpose and drops callbacks carrying any other token, so
//! a cancelled or superseded timer can never mutate state.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerToken(pub u64);

impl fmt::Display for TimerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerOperation {
    NotifyAfter { token: TimerToken, millis: u64 },
    Cancel { token: TimerToken },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerOutput {
    Elapsed { token: TimerToken },
    Cancelled { token: TimerToken },
}

impl TimerOutput {
    #[must_use]
    pub const fn token(&self) -> TimerToken {
        match self {
            Self::Elapsed { token } | Self::Cancelled { token } => *token,
        }
    }
}

impl Operation for TimerOperation {
    type Output = TimerOutput;
}

#[derive(Clone)]
pub struct Timer<Ev> {
    context: CapabilityContext<TimerOperation, Ev>,
}

impl<Ev> Capability<Ev> for Timer<Ev> {
    type Operation = TimerOperation;
    type MappedSelf<MappedEv> = Timer<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Timer::new(self.context.map_event(f))
    }
}

impl<Ev> Timer<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<TimerOperation, Ev>) -> Self {
        Self { context }
    }

    /// Asks the shell to call back after `millis`. Only an `Elapsed` reply
    /// produces an event; a `Cancelled` reply is swallowed.
    pub fn notify_after<F>(&self, token: TimerToken, millis: u64, callback: F)
    where
        F: FnOnce(TimerToken) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let output = ctx
                .request_from_shell(TimerOperation::NotifyAfter { token, millis })
                .await;
            if let TimerOutput::Elapsed { token } = output {
                ctx.update_app(callback(token));
            }
        });
    }

    pub fn cancel(&self, token: TimerToken) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(TimerOperation::Cancel { token }).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_token() {
        let token = TimerToken(7);
        assert_eq!(TimerOutput::Elapsed { token }.token(), token);
        assert_eq!(TimerOutput::Cancelled { token }.token(), token);
    }

    #[test]
    fn test_operation_wire_format() {
        let op = TimerOperation::NotifyAfter {
            token: TimerToken(3),
            millis: 500,
        };
        let json = serde_json::to_string(&op).unwrap();
        assert_eq!(json, r#"{"NotifyAfter":{"token":3,"millis":500}}"#);
    }
}
