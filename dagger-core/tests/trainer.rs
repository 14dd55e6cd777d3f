use anyhow::Result;
use dagger_core::{
    dummy::{ConstantPolicy, DummyAgent, DummyEnv, DummyEnvConfig, ScalePolicy},
    error::TrainerError,
    record::BufferedRecorder,
    replay_buffer::ReplayBufferConfig,
    save_expert_data, DefaultEvaluator, Policy, Trainer, TrainerConfig, Trajectory,
};
use ndarray::{arr1, arr2};
use std::path::Path;
use tempdir::TempDir;
use test_log::test;

const EXPERT_AVERAGE_RETURN: f32 = 3.5;

fn expert_paths() -> Vec<Trajectory> {
    vec![
        Trajectory::new(
            arr2(&[[0.0, 1.0], [1.0, 1.0], [2.0, 1.0]]),
            arr2(&[[1.0, 0.0], [1.0, 0.0], [1.0, 0.0]]),
            arr1(&[1.0, 1.0, 1.0]),
            arr2(&[[1.0, 1.0], [2.0, 1.0], [3.0, 1.0]]),
            arr1(&[0.0, 0.0, 1.0]),
            None,
        )
        .unwrap(),
        Trajectory::new(
            arr2(&[[0.0, 2.0], [1.0, 2.0]]),
            arr2(&[[2.0, 0.0], [2.0, 0.0]]),
            arr1(&[2.0, 2.0]),
            arr2(&[[1.0, 2.0], [2.0, 2.0]]),
            arr1(&[0.0, 1.0]),
            None,
        )
        .unwrap(),
    ]
}

fn write_expert_data(dir: &TempDir) -> Result<std::path::PathBuf> {
    let path = dir.path().join("expert_data.bin");
    save_expert_data(&path, &expert_paths())?;
    Ok(path)
}

fn trainer_config(expert_data: &Path) -> TrainerConfig {
    TrainerConfig::default()
        .expert_data(expert_data)
        .batch_size(4)
        .eval_batch_size(5)
        .ep_len(10)
        .train_batch_size(2)
        .num_agent_train_steps_per_iter(3)
}

fn replay_buffer_config() -> ReplayBufferConfig {
    ReplayBufferConfig::default().capacity(1000).seed(7)
}

fn evaluator(config: &TrainerConfig, render: bool) -> DefaultEvaluator<DummyEnv> {
    let env_config = DummyEnvConfig::default()
        .episode_lens(vec![5])
        .render(render);
    DefaultEvaluator::new(&env_config, 0, config.eval_batch_size, config.ep_len).unwrap()
}

#[test]
fn test_behavior_cloning_single_iteration() -> Result<()> {
    let dir = TempDir::new("trainer")?;
    let config = trainer_config(&write_expert_data(&dir)?).n_iter(1);
    let env_config = DummyEnvConfig::default().episode_lens(vec![2]);
    let mut evaluator = evaluator(&config, false);
    let mut agent = DummyAgent::new(vec![1.0, 0.0]);
    let mut recorder = BufferedRecorder::new();

    let mut trainer = Trainer::build(config, replay_buffer_config())?;
    let state = trainer.train::<DummyEnv, _, _, _>(
        &env_config,
        &mut agent,
        None,
        None,
        &mut evaluator,
        &mut recorder,
    )?;

    assert_eq!(state.iterations, 1);
    assert_eq!(state.total_envsteps, 0);
    assert_eq!(state.initial_return, Some(EXPERT_AVERAGE_RETURN));
    assert_eq!(env_config.counter().interactions(), 0);
    assert_eq!(trainer.buffer().len(), 5);
    assert_eq!(agent.batch_sizes(), &[2, 2, 2]);

    assert_eq!(recorder.scalar_series("Eval_AverageReturn"), vec![(0, 5.0)]);
    assert_eq!(recorder.scalar_series("Eval_AverageEpLen"), vec![(0, 5.0)]);
    assert_eq!(
        recorder.scalar_series("Train_AverageReturn"),
        vec![(0, EXPERT_AVERAGE_RETURN)]
    );
    assert_eq!(recorder.scalar_series("Train_MaxReturn"), vec![(0, 4.0)]);
    assert_eq!(recorder.scalar_series("Train_EnvstepsSoFar"), vec![(0, 0.0)]);
    assert_eq!(recorder.scalar_series("TimeSinceStart").len(), 1);
    assert_eq!(recorder.scalar_series("Training_Loss").len(), 1);
    assert_eq!(recorder.flushed_steps(), &[0]);
    Ok(())
}

#[test]
fn test_separate_eval_policy() -> Result<()> {
    let dir = TempDir::new("trainer")?;
    let config = trainer_config(&write_expert_data(&dir)?).n_iter(2);
    let env_config = DummyEnvConfig::default().episode_lens(vec![2]);
    let mut evaluator = evaluator(&config, false);
    let mut agent = DummyAgent::new(vec![1.0, 0.0]);
    let mut eval_policy = ConstantPolicy::new(vec![3.0, 0.0]);
    let mut recorder = BufferedRecorder::new();

    let mut trainer = Trainer::build(config, replay_buffer_config())?;
    trainer.train::<DummyEnv, _, _, _>(
        &env_config,
        &mut agent,
        Some(&mut eval_policy),
        None,
        &mut evaluator,
        &mut recorder,
    )?;

    // One eval rollout of 5 steps with reward 3
    assert_eq!(
        recorder.scalar_series("Eval_AverageReturn"),
        vec![(0, 15.0), (1, 15.0)]
    );
    // Training data of iteration 1 comes from the agent
    assert_eq!(
        recorder.scalar_series("Train_AverageReturn"),
        vec![(0, EXPERT_AVERAGE_RETURN), (1, 2.0)]
    );
    assert!(trainer
        .buffer()
        .paths()
        .iter()
        .skip(2)
        .all(|p| p.action() == arr2(&[[1.0, 0.0], [1.0, 0.0]])));
    Ok(())
}

#[test]
fn test_each_run_starts_with_an_empty_buffer() -> Result<()> {
    let dir = TempDir::new("trainer")?;
    let config = trainer_config(&write_expert_data(&dir)?).n_iter(1);
    let env_config = DummyEnvConfig::default().episode_lens(vec![2]);
    let mut evaluator = evaluator(&config, false);
    let mut agent = DummyAgent::new(vec![1.0, 0.0]);

    let mut trainer = Trainer::build(config, replay_buffer_config())?;
    for _ in 0..2 {
        trainer.train::<DummyEnv, _, _, _>(
            &env_config,
            &mut agent,
            None,
            None,
            &mut evaluator,
            &mut BufferedRecorder::new(),
        )?;
        assert_eq!(trainer.buffer().len(), 5);
        assert_eq!(trainer.buffer().paths(), &expert_paths()[..]);
    }
    Ok(())
}

#[test]
fn test_dagger_relabels_collected_actions() -> Result<()> {
    let dir = TempDir::new("trainer")?;
    let config = trainer_config(&write_expert_data(&dir)?)
        .n_iter(3)
        .relabel_with_expert(true);
    let env_config = DummyEnvConfig::default().episode_lens(vec![2]);
    let mut evaluator = evaluator(&config, false);
    let mut agent = DummyAgent::new(vec![1.0, 0.0]);
    let mut oracle = ScalePolicy::new(0.5);
    let mut recorder = BufferedRecorder::new();

    let mut trainer = Trainer::build(config, replay_buffer_config())?;
    let state = trainer.train::<DummyEnv, _, _, _>(
        &env_config,
        &mut agent,
        None,
        Some(&mut oracle),
        &mut evaluator,
        &mut recorder,
    )?;

    assert_eq!(state.iterations, 3);
    assert_eq!(state.total_envsteps, 8);
    assert_eq!(oracle.n_calls(), 8);
    assert_eq!(trainer.buffer().len(), 5 + 8);

    let paths = trainer.buffer().paths();
    assert_eq!(&paths[..2], &expert_paths()[..]);
    for path in paths[2..].iter() {
        assert_eq!(path.action(), path.observation().to_owned() * 0.5);
        // Rewards were produced by the agent's actions, not the oracle's
        assert_eq!(path.reward().to_vec(), vec![1.0, 1.0]);
        assert_eq!(path.terminal().to_vec(), vec![0.0, 1.0]);
    }

    assert_eq!(
        recorder.scalar_series("Train_EnvstepsSoFar"),
        vec![(0, 0.0), (1, 4.0), (2, 8.0)]
    );
    assert_eq!(
        recorder.scalar_series("Initial_DataCollection_AverageReturn"),
        vec![
            (0, EXPERT_AVERAGE_RETURN),
            (1, EXPERT_AVERAGE_RETURN),
            (2, EXPERT_AVERAGE_RETURN)
        ]
    );
    assert_eq!(
        recorder.scalar_series("Train_AverageReturn"),
        vec![(0, EXPERT_AVERAGE_RETURN), (1, 2.0), (2, 2.0)]
    );
    Ok(())
}

#[test]
fn test_relabeling_starts_at_configured_iteration() -> Result<()> {
    let dir = TempDir::new("trainer")?;
    let config = trainer_config(&write_expert_data(&dir)?)
        .n_iter(3)
        .relabel_with_expert(true)
        .start_relabel_with_expert(2);
    let env_config = DummyEnvConfig::default().episode_lens(vec![2]);
    let mut evaluator = evaluator(&config, false);
    let mut agent = DummyAgent::new(vec![1.0, 0.0]);
    let mut oracle = ScalePolicy::new(0.5);

    let mut trainer = Trainer::build(config, replay_buffer_config())?;
    trainer.train::<DummyEnv, _, _, _>(
        &env_config,
        &mut agent,
        None,
        Some(&mut oracle as &mut dyn Policy),
        &mut evaluator,
        &mut BufferedRecorder::new(),
    )?;

    let paths = trainer.buffer().paths();
    assert_eq!(paths.len(), 2 + 2 + 2);
    for path in paths[2..4].iter() {
        assert_eq!(path.action(), arr2(&[[1.0, 0.0], [1.0, 0.0]]));
    }
    for path in paths[4..].iter() {
        assert_eq!(path.action(), path.observation().to_owned() * 0.5);
    }
    assert_eq!(oracle.n_calls(), 4);
    Ok(())
}

#[test]
fn test_missing_expert_data_fails_before_env_interaction() -> Result<()> {
    let config = TrainerConfig::default()
        .n_iter(2)
        .batch_size(4)
        .ep_len(10);
    let env_config = DummyEnvConfig::default().episode_lens(vec![2]);
    let mut evaluator = evaluator(&config, false);
    let mut agent = DummyAgent::new(vec![1.0, 0.0]);

    let mut trainer = Trainer::build(config, replay_buffer_config())?;
    let err = trainer
        .train::<DummyEnv, _, _, _>(
            &env_config,
            &mut agent,
            None,
            None,
            &mut evaluator,
            &mut BufferedRecorder::new(),
        )
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<TrainerError>(),
        Some(&TrainerError::MissingExpertData)
    );
    assert_eq!(env_config.counter().interactions(), 0);
    assert!(agent.batch_sizes().is_empty());
    Ok(())
}

#[test]
fn test_zero_batch_size_fails_before_env_interaction() -> Result<()> {
    let dir = TempDir::new("trainer")?;
    let config = trainer_config(&write_expert_data(&dir)?)
        .n_iter(2)
        .batch_size(0);
    let env_config = DummyEnvConfig::default().episode_lens(vec![2]);
    let mut evaluator = evaluator(&config, false);
    let mut agent = DummyAgent::new(vec![1.0, 0.0]);

    let mut trainer = Trainer::build(config, replay_buffer_config())?;
    let err = trainer
        .train::<DummyEnv, _, _, _>(
            &env_config,
            &mut agent,
            None,
            None,
            &mut evaluator,
            &mut BufferedRecorder::new(),
        )
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<TrainerError>(),
        Some(TrainerError::InvalidConfig(_))
    ));
    assert_eq!(env_config.counter().builds(), 0);
    assert_eq!(env_config.counter().interactions(), 0);
    assert!(agent.batch_sizes().is_empty());
    Ok(())
}

#[test]
fn test_unreadable_expert_data_fails_before_env_interaction() -> Result<()> {
    let dir = TempDir::new("trainer")?;
    let config = trainer_config(&dir.path().join("missing.bin")).n_iter(2);
    let env_config = DummyEnvConfig::default().episode_lens(vec![2]);
    let mut evaluator = evaluator(&config, false);
    let mut agent = DummyAgent::new(vec![1.0, 0.0]);

    let mut trainer = Trainer::build(config, replay_buffer_config())?;
    let r = trainer.train::<DummyEnv, _, _, _>(
        &env_config,
        &mut agent,
        None,
        None,
        &mut evaluator,
        &mut BufferedRecorder::new(),
    );

    assert!(r.is_err());
    assert_eq!(env_config.counter().interactions(), 0);
    Ok(())
}

#[test]
fn test_relabeling_requires_an_oracle() -> Result<()> {
    let dir = TempDir::new("trainer")?;
    let config = trainer_config(&write_expert_data(&dir)?).relabel_with_expert(true);
    let env_config = DummyEnvConfig::default().episode_lens(vec![2]);
    let mut evaluator = evaluator(&config, false);
    let mut agent = DummyAgent::new(vec![1.0, 0.0]);

    let mut trainer = Trainer::build(config, replay_buffer_config())?;
    let err = trainer
        .train::<DummyEnv, _, _, _>(
            &env_config,
            &mut agent,
            None,
            None,
            &mut evaluator,
            &mut BufferedRecorder::new(),
        )
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<TrainerError>(),
        Some(&TrainerError::MissingOracle)
    );
    assert!(trainer.buffer().is_empty());
    Ok(())
}

#[test]
fn test_logging_cadence() -> Result<()> {
    let dir = TempDir::new("trainer")?;
    let config = trainer_config(&write_expert_data(&dir)?)
        .n_iter(4)
        .scalar_log_freq(2)
        .video_log_freq(Some(3))
        .n_videos(2)
        .max_video_len(3);
    let env_config = DummyEnvConfig::default()
        .episode_lens(vec![2])
        .render(true);
    let mut evaluator = evaluator(&config, true);
    let mut agent = DummyAgent::new(vec![1.0, 0.0]);
    let mut recorder = BufferedRecorder::new();

    let mut trainer = Trainer::build(config, replay_buffer_config())?;
    trainer.train::<DummyEnv, _, _, _>(
        &env_config,
        &mut agent,
        None,
        None,
        &mut evaluator,
        &mut recorder,
    )?;

    assert_eq!(recorder.flushed_steps(), &[0, 2]);
    assert_eq!(
        recorder
            .scalar_series("Eval_AverageReturn")
            .iter()
            .map(|(step, _)| *step)
            .collect::<Vec<_>>(),
        vec![0, 2]
    );

    // Iteration 0 uses expert data, which has no rendered rollouts
    let videos = recorder.videos();
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0].title, "train_rollouts");
    assert_eq!(videos[1].title, "eval_rollouts");
    assert!(videos.iter().all(|v| v.step == 3 && v.n_videos == 2));
    Ok(())
}

#[test]
fn test_save_params_on_logging_iterations() -> Result<()> {
    let dir = TempDir::new("trainer")?;
    let model_dir = dir.path().join("model");
    let config = trainer_config(&write_expert_data(&dir)?)
        .n_iter(3)
        .scalar_log_freq(2)
        .save_params(true)
        .model_dir(model_dir.to_string_lossy());
    let env_config = DummyEnvConfig::default().episode_lens(vec![2]);
    let mut evaluator = evaluator(&config, false);
    let mut agent = DummyAgent::new(vec![1.0, 0.0]);

    let mut trainer = Trainer::build(config, replay_buffer_config())?;
    trainer.train::<DummyEnv, _, _, _>(
        &env_config,
        &mut agent,
        None,
        None,
        &mut evaluator,
        &mut BufferedRecorder::new(),
    )?;

    assert!(model_dir.join("itr_0").join("agent.json").exists());
    assert!(!model_dir.join("itr_1").exists());
    assert!(model_dir.join("itr_2").join("agent.json").exists());
    Ok(())
}

#[test]
fn test_env_errors_propagate() -> Result<()> {
    let dir = TempDir::new("trainer")?;
    let config = trainer_config(&write_expert_data(&dir)?).n_iter(2);
    let env_config = DummyEnvConfig::default()
        .episode_lens(vec![2])
        .fail_on_step(Some(3));
    let mut evaluator = evaluator(&config, false);
    let mut agent = DummyAgent::new(vec![1.0, 0.0]);

    let mut trainer = Trainer::build(config, replay_buffer_config())?;
    let err = trainer
        .train::<DummyEnv, _, _, _>(
            &env_config,
            &mut agent,
            None,
            None,
            &mut evaluator,
            &mut BufferedRecorder::new(),
        )
        .unwrap_err();

    assert_eq!(err.to_string(), "Dummy env failed at step 3");
    assert_eq!(trainer.buffer().len(), 5);
    Ok(())
}
