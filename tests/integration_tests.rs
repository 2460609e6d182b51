use volley::models::constants::FIXED_ONE;
use volley::models::position::Point;
use volley::models::spell::Tech;
use volley::models::unit::{UnitId, UnitInfo};
use volley::sandbox::{SandboxAi, SandboxWorld};
use volley::services::claimable::Claimable;
use volley::services::damage::{HallucinationHit, WeaponDamage};
use volley::{
    BulletConfig, BulletFramesInput, BulletState, BulletSystem, Simulation, UnitWorld, WeaponId,
    WeaponTable,
};

fn unit(player: u8, x: i32, y: i32, hp: i32) -> UnitInfo {
    UnitInfo {
        position: Point::new(x, y),
        player,
        hitpoints: hp * FIXED_ONE,
        dimensions: [8, 9, 8, 10],
        ..Default::default()
    }
}

fn shooter_at(world: &mut SandboxWorld, player: u8, x: i32, y: i32, target: UnitId) -> UnitId {
    let mut info = unit(player, x, y, 40);
    info.target = Some(target);
    world.spawn(info)
}

fn run_until_empty(sim: &mut Simulation<SandboxWorld, SandboxAi>, max_frames: u32) -> Vec<volley::FrameReport> {
    let mut reports = Vec::new();
    for _ in 0..max_frames {
        reports.push(sim.step());
        if sim.bullets().bullet_count() == 0 {
            break;
        }
    }
    reports
}

#[test]
fn instant_hit_lands_in_the_frame_it_was_fired() {
    let mut world = SandboxWorld::new(1);
    let mut target_info = unit(2, 160, 100, 40);
    target_info.armor = 1;
    let target = world.spawn(target_info);
    let marine = shooter_at(&mut world, 1, 100, 100, target);

    let mut sim = Simulation::new(world, SandboxAi::default());
    let id = sim.fire(marine, WeaponId::GAUSS_RIFLE).unwrap();
    assert_eq!(sim.bullets().owning_vector(id), Some(BulletState::Init));

    let report = sim.step();
    assert_eq!(report.hits.len(), 1);
    assert_eq!(report.hits[0].hp_loss, 5 * FIXED_ONE);
    assert_eq!(report.unit_was_hit, vec![(target, marine)]);
    assert_eq!(report.deleted, 1);
    assert_eq!(sim.bullets().bullet_count(), 0);
    assert_eq!(sim.world().unit(target).unwrap().hitpoints, 35 * FIXED_ONE);
}

#[test]
fn splash_without_own_units_spares_allies() {
    let mut world = SandboxWorld::new(2);
    let target = world.spawn(unit(2, 300, 100, 200));
    let enemy_nearby = world.spawn(unit(2, 300, 115, 200));
    let ally_nearby = world.spawn(unit(1, 310, 100, 200));
    let allied_player = world.spawn(unit(3, 290, 100, 200));
    world.set_allied(1, 3);
    let tank = shooter_at(&mut world, 1, 100, 100, target);

    let mut sim = Simulation::new(world, SandboxAi::default());
    sim.fire(tank, WeaponId::ARCLITE_SHOCK_CANNON);
    let report = sim.step();

    let hit: Vec<UnitId> = report.hits.iter().map(|hit| hit.target).collect();
    assert_eq!(hit, vec![target, enemy_nearby]);
    for spared in [ally_nearby, allied_player, tank] {
        assert_eq!(sim.world().unit(spared).unwrap().hitpoints, 200 * FIXED_ONE);
    }
}

#[test]
fn bounces_end_after_the_last_hop() {
    let mut world = SandboxWorld::new(3);
    let first = world.spawn(unit(2, 150, 100, 100));
    let second = world.spawn(unit(2, 180, 100, 100));
    let third = world.spawn(unit(2, 210, 100, 100));
    let fourth = world.spawn(unit(2, 240, 100, 100));
    let mutalisk = shooter_at(&mut world, 1, 100, 100, first);

    let mut sim = Simulation::new(world, SandboxAi::default());
    sim.fire(mutalisk, WeaponId::GLAVE_WURM).unwrap();
    let reports = run_until_empty(&mut sim, 200);

    let hits: Vec<_> = reports.iter().flat_map(|report| report.hits.iter()).collect();
    let targets: Vec<UnitId> = hits.iter().map(|hit| hit.target).collect();
    assert_eq!(targets, vec![first, second, third]);
    let losses: Vec<i32> = hits.iter().map(|hit| hit.hp_loss).collect();
    assert_eq!(losses, vec![9 * FIXED_ONE, 3 * FIXED_ONE, FIXED_ONE]);
    assert_eq!(sim.world().unit(fourth).unwrap().hitpoints, 100 * FIXED_ONE);
    assert_eq!(sim.bullets().bullet_count(), 0);
}

#[test]
fn bounce_whose_target_dies_in_flight_moves_on_at_full_damage() {
    let mut world = SandboxWorld::new(3);
    let first = world.spawn(unit(2, 250, 100, 100));
    let second = world.spawn(unit(2, 280, 100, 100));
    let mutalisk = shooter_at(&mut world, 1, 100, 100, first);

    let mut sim = Simulation::new(world, SandboxAi::default());
    sim.fire(mutalisk, WeaponId::GLAVE_WURM).unwrap();
    sim.step();
    sim.world_mut().set_hitpoints(first, 0);
    let reports = run_until_empty(&mut sim, 200);

    let hits: Vec<(UnitId, i32)> = reports
        .iter()
        .flat_map(|report| report.hits.iter())
        .map(|hit| (hit.target, hit.hp_loss))
        .collect();
    assert_eq!(hits, vec![(second, 9 * FIXED_ONE)]);
    assert_eq!(sim.bullets().bullet_count(), 0);
}

#[test]
fn hits_on_one_unit_coalesce() {
    let mut world = SandboxWorld::new(4);
    let target = world.spawn(unit(2, 160, 100, 100));
    let shooters: Vec<UnitId> = (0..3)
        .map(|i| shooter_at(&mut world, 1, 100, 80 + i * 20, target))
        .collect();

    let mut sim = Simulation::new(world, SandboxAi::default());
    for &shooter in &shooters {
        sim.fire(shooter, WeaponId::GAUSS_RIFLE).unwrap();
    }
    let report = sim.step();

    assert_eq!(report.hits.len(), 3);
    let total: i32 = report.hits.iter().map(|hit| hit.hp_loss).sum();
    assert_eq!(total, 18 * FIXED_ONE);
    assert_eq!(sim.world().unit(target).unwrap().hitpoints, 82 * FIXED_ONE);
    let attackers: Vec<UnitId> = report.unit_was_hit.iter().map(|&(_, attacker)| attacker).collect();
    assert_eq!(attackers, shooters);
}

#[test]
fn overkill_reports_one_death() {
    let mut world = SandboxWorld::new(5);
    let target = world.spawn(unit(2, 160, 100, 8));
    let first = shooter_at(&mut world, 1, 100, 100, target);
    let second = shooter_at(&mut world, 1, 100, 120, target);

    let mut sim = Simulation::new(world, SandboxAi::default());
    sim.fire(first, WeaponId::GAUSS_RIFLE);
    sim.fire(second, WeaponId::GAUSS_RIFLE);
    let report = sim.step();

    assert_eq!(report.killed, vec![target]);
    assert_eq!(sim.world().kills, vec![(target, Some(1))]);
    assert_eq!(sim.world().unit(target).unwrap().hitpoints, 0);
    let total: i32 = report.hits.iter().map(|hit| hit.hp_loss).sum();
    assert_eq!(total, 8 * FIXED_ONE);
}

#[test]
fn outside_damage_resolves_before_bullets_and_hallucinations_last() {
    let mut world = SandboxWorld::new(6);
    let target = world.spawn(unit(2, 160, 100, 100));
    let zealot = world.spawn(unit(1, 150, 100, 100));
    let illusion = world.spawn(unit(1, 140, 100, 100));
    let marine = shooter_at(&mut world, 1, 100, 100, target);

    let mut sim = Simulation::new(world, SandboxAi::default());
    sim.fire(marine, WeaponId::GAUSS_RIFLE);
    let report = sim.step_with(
        vec![WeaponDamage {
            target,
            attacker: Some(zealot),
            damage: 8 * FIXED_ONE,
            weapon: WeaponId::PSI_ASSAULT,
            player: 1,
            direction: 64,
        }],
        vec![HallucinationHit {
            target,
            attacker: illusion,
            direction: 64,
        }],
    );

    let weapons: Vec<WeaponId> = report.hits.iter().map(|hit| hit.weapon).collect();
    assert_eq!(weapons, vec![WeaponId::PSI_ASSAULT, WeaponId::GAUSS_RIFLE]);
    assert_eq!(
        report.unit_was_hit,
        vec![(target, zealot), (target, marine), (target, illusion)]
    );
    assert_eq!(sim.world().hallucination_hits, vec![(target, illusion)]);
    assert_eq!(sim.world().unit(target).unwrap().hitpoints, 86 * FIXED_ONE);
}

#[test]
fn allies_are_called_to_help() {
    let mut world = SandboxWorld::new(7);
    let target = world.spawn(unit(2, 160, 100, 100));
    let friend = world.spawn(unit(2, 190, 100, 100));
    let marine = shooter_at(&mut world, 1, 100, 100, target);

    let mut sim = Simulation::new(world, SandboxAi::default());
    sim.fire(marine, WeaponId::GAUSS_RIFLE);
    let report = sim.step();

    assert_eq!(report.ai_hits.len(), 2);
    assert_eq!(report.ai_hits[0].unit, target);
    assert!(report.ai_hits[0].main_target_reactions);
    assert_eq!(report.ai_hits[1].unit, friend);
    assert!(!report.ai_hits[1].main_target_reactions);
    assert_eq!(sim.ai().hits, report.ai_hits);
}

#[test]
fn hallucinated_shooters_deal_no_damage() {
    let mut world = SandboxWorld::new(8);
    let target = world.spawn(unit(2, 160, 100, 40));
    let mut fake = unit(1, 100, 100, 40);
    fake.target = Some(target);
    fake.is_hallucination = true;
    let fake = world.spawn(fake);

    let mut sim = Simulation::new(world, SandboxAi::default());
    sim.fire(fake, WeaponId::GAUSS_RIFLE);
    let report = sim.step();

    assert!(report.hits.is_empty());
    assert_eq!(sim.world().hallucination_hits, vec![(target, fake)]);
    assert_eq!(report.unit_was_hit, vec![(target, fake)]);
    assert_eq!(sim.world().unit(target).unwrap().hitpoints, 40 * FIXED_ONE);
}

#[test]
fn overlapping_storms_hit_once_per_frame() {
    let mut world = SandboxWorld::new(9);
    let victim = world.spawn(unit(2, 300, 300, 100));
    let mut templars = Vec::new();
    for x in [100, 120] {
        let mut info = unit(1, x, 100, 40);
        info.order_target_pos = Point::new(300, 300);
        templars.push(world.spawn(info));
    }

    let mut sim = Simulation::new(world, SandboxAi::default());
    for &templar in &templars {
        sim.fire(templar, WeaponId::PSI_STORM).unwrap();
    }
    sim.step();
    assert_eq!(sim.bullets().state_vector(BulletState::GroundDamage).len(), 2);
    let report = sim.step();
    assert_eq!(report.hits.len(), 1);
    assert_eq!(sim.world().unit(victim).unwrap().hitpoints, 86 * FIXED_ONE);

    let reports = run_until_empty(&mut sim, 200);
    assert!(reports.iter().any(|report| report.killed == vec![victim]));
    assert!(sim.world().unit(victim).unwrap().is_dead());
}

#[test]
fn spell_bullets_cast_on_impact() {
    let mut world = SandboxWorld::new(10);
    let target = world.spawn(unit(2, 200, 100, 100));
    let ghost = shooter_at(&mut world, 1, 100, 100, target);

    let mut sim = Simulation::new(world, SandboxAi::default());
    sim.fire(ghost, WeaponId::LOCKDOWN).unwrap();
    let reports = run_until_empty(&mut sim, 100);

    let spells: Vec<_> = reports.iter().flat_map(|report| report.spells.iter()).collect();
    assert_eq!(spells.len(), 1);
    assert_eq!(spells[0].tech, Tech::Lockdown);
    assert_eq!(spells[0].target, Some(target));
    assert_eq!(sim.world().spells.len(), 1);
}

#[test]
fn suicide_attack_kills_the_attacker() {
    let mut world = SandboxWorld::new(11);
    let target = world.spawn(unit(2, 103, 100, 200));
    let scourge = shooter_at(&mut world, 1, 100, 100, target);

    let mut sim = Simulation::new(world, SandboxAi::default());
    sim.fire(scourge, WeaponId::SUICIDE).unwrap();
    let report = sim.step();

    assert_eq!(report.hits.len(), 1);
    assert!(report.killed.contains(&scourge));
    assert!(!report.killed.contains(&target));
    assert!(sim.world().unit(scourge).unwrap().is_dead());
}

#[test]
fn higher_ground_misses_deal_nothing() {
    let mut world = SandboxWorld::new(12);
    let target = world.spawn(unit(2, 160, 100, 1000));
    world.set_higher_ground(target, true);
    let marines: Vec<UnitId> = (0..10)
        .map(|i| shooter_at(&mut world, 1, 100, 60 + i * 10, target))
        .collect();

    let config = BulletConfig {
        miss_chance: 255,
        ..Default::default()
    };
    let system = BulletSystem::new(config, WeaponTable::default());
    let mut sim = Simulation::with_system(system, world, SandboxAi::default());
    let ids: Vec<_> = marines
        .iter()
        .map(|&marine| sim.fire(marine, WeaponId::GAUSS_RIFLE).unwrap())
        .collect();
    let missed = ids
        .iter()
        .filter(|&&id| sim.bullets().get(id).unwrap().flags.missed)
        .count();
    assert!(missed > 0);

    let report = sim.step();
    assert_eq!(report.hits.len(), ids.len() - missed);
}

#[test]
fn identical_runs_produce_identical_reports() {
    fn scenario() -> (Vec<volley::FrameReport>, SandboxWorld) {
        let mut world = SandboxWorld::new(99);
        let targets: Vec<UnitId> = (0..4).map(|i| world.spawn(unit(2, 250 + i * 25, 150, 60))).collect();
        let mut shooters = Vec::new();
        for (i, &target) in targets.iter().enumerate() {
            shooters.push(shooter_at(&mut world, 1, 100, 100 + i as i32 * 20, target));
        }
        let mut sim = Simulation::new(world, SandboxAi::default());
        let weapons = [
            WeaponId::GLAVE_WURM,
            WeaponId::FRAGMENTATION_GRENADE,
            WeaponId::SCARAB,
            WeaponId::HALO_ROCKETS,
        ];
        let mut reports = Vec::new();
        for frame in 0..60 {
            if frame % 10 == 0 {
                for (&shooter, &weapon) in shooters.iter().zip(&weapons) {
                    sim.fire(shooter, weapon);
                }
            }
            reports.push(sim.step());
        }
        (reports, sim.world().clone())
    }

    let (first_reports, first_world) = scenario();
    let (second_reports, second_world) = scenario();
    assert_eq!(first_reports, second_reports);
    assert_eq!(first_world.kills, second_world.kills);
    let first_hp: Vec<_> = first_world.unit_ids().map(|id| first_world.unit(id)).collect();
    let second_hp: Vec<_> = second_world.unit_ids().map(|id| second_world.unit(id)).collect();
    assert_eq!(first_hp, second_hp);
}

#[test]
fn reload_mid_flight_reproduces_the_rest_of_the_run() {
    let mut world = SandboxWorld::new(13);
    let far = world.spawn(unit(2, 600, 100, 500));
    let near = world.spawn(unit(2, 300, 200, 500));
    let battlecruiser = shooter_at(&mut world, 1, 100, 100, far);
    let reaver = shooter_at(&mut world, 1, 100, 200, near);

    let mut sim = Simulation::new(world, SandboxAi::default());
    sim.fire(battlecruiser, WeaponId::YAMATO_GUN);
    sim.fire(reaver, WeaponId::SCARAB);
    sim.run(4);
    let before: Vec<_> = sim.bullets().active_bullets().map(|b| (b.weapon, b.state())).collect();

    let json = sim.save_json().unwrap();
    let mut loaded = Simulation::load_json(
        &json,
        sim.world().clone(),
        SandboxAi::default(),
        BulletConfig::default(),
        WeaponTable::default(),
    )
    .unwrap();
    let after: Vec<_> = loaded.bullets().active_bullets().map(|b| (b.weapon, b.state())).collect();
    assert_eq!(before, after);
    assert_eq!(sim.run(80), loaded.run(80));
}

#[test]
fn delete_all_leaves_an_empty_system() {
    let mut world = SandboxWorld::new(14);
    let target = world.spawn(unit(2, 600, 100, 500));
    let shooter = shooter_at(&mut world, 1, 100, 100, target);
    let mut system = BulletSystem::default();
    let mut ai = SandboxAi::default();
    for _ in 0..5 {
        system.allocate_bullet(&mut world, Some(shooter), 1, 64, WeaponId::SCARAB, Point::new(100, 100));
        system.progress_frames(&mut world, &mut ai, BulletFramesInput::default());
    }
    assert_eq!(system.bullet_count(), 5);

    system.delete_all();
    assert_eq!(system.bullet_count(), 0);
    let report = system.progress_frames(&mut world, &mut ai, BulletFramesInput::default());
    assert!(report.hits.is_empty());
    assert_eq!(report.deleted, 0);
}

#[test]
#[should_panic(expected = "claimed twice")]
fn frame_buffers_cannot_be_claimed_twice() {
    let buffers: Claimable<Vec<UnitId>> = Claimable::default();
    let _frame = buffers.claim();
    let _nested = buffers.claim();
}

#[test]
fn weapon_table_overrides_apply() {
    let json = r#"{
        "weapons": {
            "0": {
                "name": "Heavy Gauss",
                "damage": 30,
                "damage_type": "Normal",
                "explosion": "Normal",
                "behaviour": "AppearOnTargetUnit"
            }
        }
    }"#;
    let weapons = WeaponTable::from_json_str(json).unwrap();
    let mut world = SandboxWorld::new(15);
    let target = world.spawn(unit(2, 160, 100, 100));
    let marine = shooter_at(&mut world, 1, 100, 100, target);

    let system = BulletSystem::new(BulletConfig::default(), weapons);
    let mut sim = Simulation::with_system(system, world, SandboxAi::default());
    sim.fire(marine, WeaponId::GAUSS_RIFLE).unwrap();
    assert!(sim.fire(marine, WeaponId::YAMATO_GUN).is_none());
    sim.step();
    assert_eq!(sim.world().unit(target).unwrap().hitpoints, 70 * FIXED_ONE);
}

#[test]
fn oversized_table_damage_kills_without_overflow() {
    let json = r#"{
        "weapons": {
            "0": {
                "name": "Overcharged Gauss",
                "damage": 65535,
                "factor": 255,
                "damage_type": "Normal",
                "explosion": "Normal",
                "behaviour": "AppearOnTargetUnit"
            }
        }
    }"#;
    let weapons = WeaponTable::from_json_str(json).unwrap();
    let mut world = SandboxWorld::new(16);
    let mut target_info = unit(2, 160, 100, 100);
    target_info.is_hallucination = true;
    let target = world.spawn(target_info);
    let marine = shooter_at(&mut world, 1, 100, 100, target);

    let system = BulletSystem::new(BulletConfig::default(), weapons);
    let mut sim = Simulation::with_system(system, world, SandboxAi::default());
    sim.fire(marine, WeaponId::GAUSS_RIFLE).unwrap();
    let report = sim.step();
    assert_eq!(report.hits.len(), 1);
    assert_eq!(report.hits[0].hp_loss, 100 * FIXED_ONE);
    assert_eq!(report.killed, vec![target]);
}
