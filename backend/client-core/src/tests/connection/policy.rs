use crate::connection::policy::ReconnectPolicy;

use std::time::Duration;

fn millis(delay: Option<Duration>) -> Option<u128> {
    delay.map(|d| d.as_millis())
}

/// **VALUE**: The stock schedule is exactly 1s, 2s, 4s, 8s, 16s and then gives up.
///
/// **WHY THIS MATTERS**: Operators size server restarts around this schedule; jitter or
/// an off-by-one in the attempt limit changes when clients come back.
///
/// **BUG THIS CATCHES**: A sixth attempt, randomised delays, or starting at 2s.
#[test]
fn given_fresh_policy_when_delays_requested_then_doubles_from_one_second_for_five_attempts() {
    // GIVEN: The default policy
    let mut policy = ReconnectPolicy::default();

    // WHEN: Asking for delays until exhausted
    let delays: Vec<_> = std::iter::from_fn(|| millis(policy.next_delay())).collect();

    // THEN: Five doubling delays, then nothing
    assert_eq!(delays, vec![1000, 2000, 4000, 8000, 16000]);
    assert_eq!(policy.attempts(), 5);
    assert_eq!(policy.next_delay(), None);
}

/// **BUG THIS CATCHES**: Delays growing past the cap when more attempts are allowed.
#[test]
fn given_more_attempts_when_delays_requested_then_caps_at_thirty_seconds() {
    // GIVEN: A policy allowing eight attempts with the default bounds
    let mut policy = ReconnectPolicy::new(
        8,
        Duration::from_millis(1000),
        Duration::from_millis(30_000),
    );

    // WHEN: Draining it
    let delays: Vec<_> = std::iter::from_fn(|| millis(policy.next_delay())).collect();

    // THEN: Capped at 30s after 16s
    assert_eq!(
        delays,
        vec![1000, 2000, 4000, 8000, 16000, 30000, 30000, 30000]
    );
}

/// **VALUE**: A successful open restarts the schedule from the beginning.
///
/// **BUG THIS CATCHES**: Resetting the counter but not the interval, so the next outage
/// starts at 8s instead of 1s.
#[test]
fn given_partially_used_policy_when_reset_then_next_delay_is_initial() {
    // GIVEN: A policy that has already backed off three times
    let mut policy = ReconnectPolicy::default();
    for _ in 0..3 {
        policy.next_delay();
    }

    // WHEN: Resetting
    policy.reset();

    // THEN: Counter and delay start over
    assert_eq!(policy.attempts(), 0);
    assert_eq!(millis(policy.next_delay()), Some(1000));
}

#[test]
fn given_disabled_policy_when_delay_requested_then_returns_none() {
    let mut policy = ReconnectPolicy::default();

    policy.disable();

    assert!(!policy.is_enabled());
    assert_eq!(policy.next_delay(), None);
    assert_eq!(policy.attempts(), 0);
}
