use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use std::time::Instant;

use wfc_tilemap::presets;
use wfc_tilemap::Dimensions;
use wfc_tilemap::Direction;
use wfc_tilemap::Entropy;
use wfc_tilemap::Event;
use wfc_tilemap::Progress;
use wfc_tilemap::Rule;
use wfc_tilemap::RuleTable;
use wfc_tilemap::SpriteIndex;
use wfc_tilemap::State;
use wfc_tilemap::Tile;
use wfc_tilemap::Wave;
use wfc_tilemap::WaveConfig;
use wfc_tilemap::WfcError;

fn init_logger() {
    let _ = env_logger::builder()
        // Include all events in tests
        .filter_level(log::LevelFilter::max())
        // Ensure events are captured by `cargo test`
        .is_test(true)
        // Ignore errors initializing the logger if tests race to configure it
        .try_init();
}

fn terrain(width: usize, height: usize, seed: u64) -> WaveConfig {
    WaveConfig::new(
        "map",
        Dimensions::new(width, height),
        presets::TERRAIN_SHEET,
    )
    .with_seed(seed)
    .with_rules(presets::terrain_rules())
}

fn pair_rules() -> RuleTable {
    RuleTable::from_json(
        r#"{
            "0": { "weight": 1, "right": [1] },
            "1": { "weight": 1, "left": [0] }
        }"#,
    )
    .expect("valid rules")
}

fn sprites(wave: &Wave) -> Vec<Option<SpriteIndex>> {
    wave.grid().iter().map(|tile| tile.sprite).collect()
}

#[test]
fn auto_run_collapses_everything() {
    init_logger();

    for seed in 0..10 {
        let mut wave = Wave::new(terrain(12, 9, seed));
        wave.initialize().expect("terrain rules are valid");

        assert_eq!(wave.generate().expect("terrain never contradicts"), Progress::Complete);
        assert_eq!(wave.state(), State::Collapsed);
        assert_eq!(wave.remaining(), 0);
        assert_eq!(wave.history_len(), 12 * 9);
        assert!(wave
            .grid()
            .iter()
            .all(|tile| tile.sprite.is_some() && tile.entropy == Entropy::Known(0)));
    }
}

#[test]
fn every_collapse_respects_settled_neighbors() {
    init_logger();

    let mut wave = Wave::new(terrain(8, 8, 77).manual());
    wave.initialize().unwrap();

    let mut before = wave.grid().clone();
    let mut progress = wave.generate().unwrap();

    loop {
        let tile = match &progress {
            Progress::Collapsed(tile) => tile.clone(),
            Progress::Complete => break,
        };

        let candidate = before.get(tile.position).unwrap();
        let sprite = tile.sprite.unwrap();

        if let Entropy::Known(_) = candidate.entropy {
            assert!(
                candidate.available.contains(&sprite),
                "tile {} took {sprite}, allowed {:?}",
                tile.position,
                candidate.available
            );
        }

        before = wave.grid().clone();
        progress = wave.step().unwrap();
    }

    // final check on every adjacent pair, from both sides
    let rules = presets::terrain_rules();
    let grid = wave.grid();
    for tile in grid.iter() {
        for direction in Direction::ALL {
            let Some(offset) = grid.neighbor(tile.position, direction) else {
                continue;
            };

            let here = tile.sprite.unwrap();
            let there = grid.get(offset).unwrap().sprite.unwrap();
            assert!(rules.permitted(here, direction).contains(&there));
        }
    }
}

#[test]
fn same_seed_same_map() {
    init_logger();

    let run = |seed| {
        let mut wave = Wave::new(terrain(15, 10, seed));
        wave.initialize().unwrap();
        wave.generate().unwrap();
        (sprites(&wave), wave.seed())
    };

    assert_eq!(run(1234), run(1234));
    assert_ne!(run(1234).0, run(4321).0);
}

#[test]
fn same_steps_same_map() {
    init_logger();

    let run = || {
        let mut wave = Wave::new(terrain(6, 6, 8).with_starting_index(14).manual());
        wave.initialize().unwrap();
        wave.generate().unwrap();

        for _ in 0..10 {
            wave.step().unwrap();
        }
        wave.undo().unwrap();
        wave.step().unwrap();

        wave.grid().to_vec()
    };

    assert_eq!(run(), run());
}

#[test]
fn undo_restores_previous_grid() {
    init_logger();

    let mut wave = Wave::new(terrain(5, 5, 99).manual());
    wave.initialize().unwrap();
    wave.generate().unwrap();
    wave.step().unwrap();
    wave.step().unwrap();

    let before = wave.grid().clone();
    let steps = wave.history_len();

    wave.step().unwrap();
    assert_ne!(wave.grid(), &before);

    wave.undo().unwrap();
    assert_eq!(wave.grid(), &before);
    assert_eq!(wave.history_len(), steps);
    assert_eq!(wave.state(), State::Collapsing);

    // generation carries on from the restored grid
    let mut progress = wave.step().unwrap();
    while let Progress::Collapsed(_) = progress {
        progress = wave.step().unwrap();
    }
    assert!(wave.is_complete());
}

#[test]
fn undo_after_completion_reopens_generation() {
    init_logger();

    let mut wave = Wave::new(terrain(3, 3, 5));
    wave.initialize().unwrap();
    wave.generate().unwrap();

    wave.undo().unwrap();
    assert_eq!(wave.state(), State::Collapsing);
    assert_eq!(wave.remaining(), 1);

    assert_eq!(wave.step().unwrap(), Progress::Complete);
}

#[test]
fn only_consistent_assignment_wins() {
    init_logger();

    for seed in 0..50 {
        let config = WaveConfig::new("pair", Dimensions::new(2, 1), Dimensions::new(2, 1))
            .with_seed(seed)
            .with_rules(pair_rules())
            .with_starting_index(0);

        let mut wave = Wave::new(config);
        wave.initialize().unwrap();
        wave.generate().unwrap();

        assert_eq!(
            sprites(&wave),
            vec![Some(SpriteIndex(0)), Some(SpriteIndex(1))],
            "seed {seed}"
        );
    }
}

#[test]
fn contradicting_seeds_fail_generation() {
    init_logger();

    let mut rules = RuleTable::new();
    rules.insert(SpriteIndex(0), Rule::with_weight(1).permit(Direction::Right, [0]));
    rules.insert(SpriteIndex(1), Rule::with_weight(1).permit(Direction::Left, [0]));

    let config = WaveConfig::new("forced", Dimensions::new(2, 1), Dimensions::new(2, 1))
        .with_seed(1)
        .with_rules(rules);

    let mut wave = Wave::new(config);
    wave.initialize().unwrap();

    // 0 does not permit 1 on its right
    wave.set_tile(0, SpriteIndex(0)).unwrap();
    wave.set_tile(1, SpriteIndex(1)).unwrap();

    assert!(matches!(
        wave.generate(),
        Err(WfcError::Contradiction { position: 1 })
    ));
    assert_eq!(wave.state(), State::Failed);
}

#[test]
fn contradiction_during_generation_can_be_undone() {
    init_logger();

    let mut rules = RuleTable::new();
    rules.insert(SpriteIndex(0), Rule::with_weight(1).permit(Direction::Right, [0]));
    rules.insert(SpriteIndex(1), Rule::with_weight(1));
    rules.insert(SpriteIndex(2), Rule::with_weight(1).permit(Direction::Left, [1]));

    let config = WaveConfig::new("stuck", Dimensions::new(3, 1), Dimensions::new(3, 1))
        .with_seed(2)
        .with_rules(rules)
        .with_starting_index(0);

    let mut wave = Wave::new(config);
    wave.initialize().unwrap();
    wave.set_tile(2, SpriteIndex(2)).unwrap();
    assert_eq!(wave.tile(1).unwrap().available, vec![SpriteIndex(1)]);

    // only 0 can start on the left edge, and 0 wants another 0 where 2 wants a 1
    assert!(matches!(
        wave.generate(),
        Err(WfcError::Contradiction { position: 1 })
    ));
    assert_eq!(wave.state(), State::Failed);
    assert_eq!(wave.tile(0).unwrap().sprite, Some(SpriteIndex(0)));
    assert_eq!(wave.history_len(), 1);

    assert!(matches!(
        wave.step(),
        Err(WfcError::NotGenerating {
            state: State::Failed
        })
    ));

    wave.undo().unwrap();
    assert_eq!(wave.state(), State::Ready);
    assert_eq!(wave.tile(0).unwrap().sprite, None);
    assert_eq!(wave.tile(1).unwrap().available, vec![SpriteIndex(1)]);
}

#[test]
fn pre_seeded_start_is_kept() {
    init_logger();

    let config = WaveConfig::new("seeded", Dimensions::new(2, 1), Dimensions::new(2, 1))
        .with_seed(4)
        .with_rules(pair_rules())
        .with_starting_index(1)
        .manual();

    let mut wave = Wave::new(config);
    wave.initialize().unwrap();
    wave.set_tile(1, SpriteIndex(1)).unwrap();

    assert_eq!(wave.generate().unwrap(), Progress::Complete);
    assert_eq!(sprites(&wave), vec![Some(SpriteIndex(0)), Some(SpriteIndex(1))]);
    assert_eq!(wave.history_len(), 1);
}

#[test]
fn starting_tile_constrained_by_seed_uses_weights() {
    init_logger();

    let mut rules = presets::terrain_rules();
    rules.set_weight(presets::TREE, 1000).unwrap();

    let config = WaveConfig::new("weighted", Dimensions::new(1, 2), presets::TERRAIN_SHEET)
        .with_seed(6)
        .with_rules(rules)
        .with_starting_index(1);

    let mut wave = Wave::new(config);
    wave.initialize().unwrap();
    wave.set_tile(0, presets::GRASS).unwrap();

    // grass permits trees and grass below it
    assert_eq!(wave.tile(1).unwrap().entropy, Entropy::Known(3));

    wave.generate().unwrap();
    assert_eq!(wave.tile(1).unwrap().sprite, Some(presets::TREE));
}

#[test]
fn events_follow_the_collapses() {
    init_logger();

    let events: Rc<RefCell<Vec<Event>>> = Rc::default();
    let sink = Rc::clone(&events);

    let mut wave = Wave::new(terrain(4, 3, 21).manual());
    wave.subscribe(move |event: &Event| sink.borrow_mut().push(event.clone()));
    wave.initialize().unwrap();

    let mut collapsed: Vec<Tile> = Vec::new();
    let mut progress = wave.generate().unwrap();
    while let Progress::Collapsed(tile) = progress {
        collapsed.push(tile);
        progress = wave.step().unwrap();
    }

    let events = events.borrow();
    assert_eq!(events.len(), 12);
    assert!(events.iter().all(|event| event.generator() == "map"));

    for (event, tile) in events.iter().zip(&collapsed) {
        assert_eq!(
            event,
            &Event::TileCollapsed {
                generator: "map".to_string(),
                tile: tile.clone(),
            }
        );
    }

    assert_eq!(
        events.last(),
        Some(&Event::GenerationComplete {
            generator: "map".to_string(),
            tiles: wave.grid().to_vec(),
        })
    );
}

#[test]
fn step_delay_paces_auto_run() {
    init_logger();

    let mut wave = Wave::new(terrain(2, 2, 3).with_step_delay(Duration::from_millis(5)));
    wave.initialize().unwrap();

    let t0 = Instant::now();
    wave.generate().unwrap();

    // one pause between each of the four collapses
    assert!(t0.elapsed() >= Duration::from_millis(15));
}

#[test]
fn density_favors_grass() {
    init_logger();

    let mut rules = presets::terrain_rules();
    presets::apply_density(&mut rules, -20).unwrap();

    let mut wave = Wave::new(terrain(20, 20, 42).with_rules(rules));
    wave.initialize().unwrap();
    wave.generate().unwrap();

    let count = |sprite| {
        wave.grid()
            .iter()
            .filter(|tile| tile.sprite == Some(sprite))
            .count()
    };

    assert!(count(presets::GRASS) > count(presets::TREE) + count(presets::TREE_TOP));
}

#[test]
fn config_from_json_drives_a_wave() {
    init_logger();

    let config = WaveConfig::from_json(
        r#"{
            "name": "json",
            "grid": { "width": 2, "height": 1 },
            "sprite_sheet": { "width": 1, "height": 2 },
            "seed": 10,
            "starting_index": 1,
            "rules": {
                "0": { "weight": 1, "right": [1] },
                "1": { "weight": 1, "left": [0] }
            }
        }"#,
    )
    .unwrap();

    let mut wave = Wave::new(config);
    wave.initialize().unwrap();
    wave.generate().unwrap();

    assert_eq!(wave.name(), "json");
    assert_eq!(
        wave.sprite_coords(1),
        Some(wfc_tilemap::SpriteCoords { x: 0, y: 1 })
    );
}

#[test]
fn dangling_rules_are_refused_early() {
    init_logger();

    let mut rules = pair_rules();
    rules.insert(SpriteIndex(2), Rule::with_weight(1).permit(Direction::Up, [3]));

    let mut wave = Wave::new(terrain(2, 2, 0));
    assert!(matches!(
        wave.load_rules(rules.clone()),
        Err(WfcError::DanglingReference { .. })
    ));

    let mut wave = Wave::new(terrain(2, 2, 0).with_rules(rules));
    assert!(matches!(
        wave.initialize(),
        Err(WfcError::DanglingReference { .. })
    ));
}

#[test]
fn unallocated_grid_has_no_neighbors() {
    init_logger();

    let mut wave = Wave::new(terrain(3, 3, 0));
    assert_eq!(wave.grid().neighbor(0, Direction::Up), None);
    assert!(wave.tile(0).is_none());

    wave.initialize().unwrap();
    wave.set_dimensions(4, 4);
    assert_eq!(wave.grid().neighbor(0, Direction::Right), None);
    assert_eq!(wave.sprite_coords(0), None);
}
