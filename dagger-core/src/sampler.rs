//! Rollout collection.
//!
//! The functions in this module drive an [`Env`] with a [`Policy`] and record
//! complete rollouts as [`Trajectory`] objects:
//!
//! * [`sample_one_rollout`] - one rollout of at most `max_length` steps
//! * [`sample_batch`] - rollouts until a budget of environment steps is reached
//! * [`sample_fixed_count`] - a fixed number of rollouts, e.g. for videos
//!
//! A rollout ends when the environment reports termination or truncation, or when
//! `max_length` steps were taken, whichever comes first. The last step is always
//! flagged as terminal. Errors of the environment or the policy abort the rollout
//! and propagate to the caller.
use crate::{error::SamplerError, Env, Policy, Trajectory};
use anyhow::Result;
use log::{debug, trace};

fn check_max_length(max_length: usize) -> Result<(), SamplerError> {
    match max_length {
        0 => Err(SamplerError::InvalidMaxLength(max_length)),
        _ => Ok(()),
    }
}

/// Samples a single rollout.
///
/// When `render` is `true`, a frame is captured before each action is chosen.
/// Frames are attached to the trajectory only if the environment returned one
/// at every step; partial frames are discarded.
pub fn sample_one_rollout<E, P>(
    env: &mut E,
    policy: &mut P,
    max_length: usize,
    render: bool,
) -> Result<Trajectory>
where
    E: Env,
    P: Policy + ?Sized,
{
    check_max_length(max_length)?;

    let mut ob = env.reset()?;
    let (mut obs, mut acs, mut rewards, mut next_obs, mut terminals, mut frames) =
        (vec![], vec![], vec![], vec![], vec![], vec![]);
    let mut steps = 0;

    loop {
        if render {
            if let Some(frame) = env.render()? {
                frames.push(frame);
            }
        }

        let ac = policy.get_action(&ob)?;
        let step = env.step(&ac)?;
        steps += 1;

        let rollout_done = step.is_done() || steps >= max_length;
        obs.push(ob);
        acs.push(ac);
        rewards.push(step.reward);
        next_obs.push(step.obs.clone());
        terminals.push(if rollout_done { 1.0 } else { 0.0 });

        if rollout_done {
            break;
        }
        ob = step.obs;
    }

    if !frames.is_empty() && frames.len() != obs.len() {
        debug!(
            "Discarded {} frames of a rollout with {} steps",
            frames.len(),
            obs.len()
        );
        frames.clear();
    }

    let path = Trajectory::from_steps(&obs, &acs, rewards, &next_obs, terminals, &frames)?;
    trace!(
        "Rollout finished: {} steps, return = {}",
        path.len(),
        path.total_return()
    );
    Ok(path)
}

/// Samples rollouts until their total length reaches `min_total_timesteps`.
///
/// The last rollout is never cut, so the total may exceed the target by up to
/// `max_length - 1` steps. Returns the rollouts and the exact number of steps.
pub fn sample_batch<E, P>(
    env: &mut E,
    policy: &mut P,
    min_total_timesteps: usize,
    max_length: usize,
    render: bool,
) -> Result<(Vec<Trajectory>, usize)>
where
    E: Env,
    P: Policy + ?Sized,
{
    check_max_length(max_length)?;

    let mut timesteps_this_batch = 0;
    let mut paths = vec![];
    while timesteps_this_batch < min_total_timesteps {
        let path = sample_one_rollout(env, policy, max_length, render)?;
        timesteps_this_batch += path.len();
        paths.push(path);
    }

    Ok((paths, timesteps_this_batch))
}

/// Samples exactly `n` rollouts regardless of their lengths.
pub fn sample_fixed_count<E, P>(
    env: &mut E,
    policy: &mut P,
    n: usize,
    max_length: usize,
    render: bool,
) -> Result<Vec<Trajectory>>
where
    E: Env,
    P: Policy + ?Sized,
{
    check_max_length(max_length)?;
    (0..n)
        .map(|_| sample_one_rollout(env, policy, max_length, render))
        .collect()
}
