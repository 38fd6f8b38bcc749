use skirmish::{
    ActorSpec, Defense, Dice, Element, LifeState, Rejected, Session, StrikeKind, Weapon,
};

fn duelists(rolls: Vec<u32>) -> (Session, skirmish::ActorId, skirmish::ActorId) {
    let mut s = Session::new(Dice::from_scripted(rolls));
    let a = s.new_actor(ActorSpec::controlled("Hero", Weapon::new("Rusty Sword", 10)));
    let b = s.new_actor(ActorSpec::opponent("Goblin", Weapon::new("Rusty Sword", 10)));
    (s, a, b)
}

#[test]
fn plain_hit_with_every_roll_failing() {
    let (mut s, a, b) = duelists(vec![]);
    let report = s.resolve_attack(a, b).unwrap();

    assert_eq!(report.final_damage, 20);
    assert!(!report.was_crit);
    assert!(!report.was_dodged);
    assert!(!report.defender_died);
    assert_eq!(report.strikes.len(), 1);
    assert_eq!(s.actor(b).unwrap().hp(), 130);
    assert_eq!(s.actor(a).unwrap().hp(), 150);
}

#[test]
fn lethal_hit_clamps_to_zero_and_awards_experience() {
    let mut s = Session::new(Dice::from_scripted(vec![]));
    let a = s.new_actor(ActorSpec::controlled("Hero", Weapon::new("Rusty Sword", 10)));
    let b = s.new_actor(ActorSpec::opponent("Goblin", Weapon::new("Rusty Sword", 10)).health(15));
    assert_eq!(s.living(), 2);

    let report = s.resolve_attack(a, b).unwrap();

    let goblin = s.actor(b).unwrap();
    assert_eq!(goblin.hp(), 0);
    assert_eq!(goblin.state(), LifeState::Dead);
    assert!(report.defender_died);
    assert!(report.strikes[0].killed);
    assert_eq!(s.living(), 1);
    // sqrt(20 × 150)
    assert_eq!(report.total_experience(a), 54);
    assert_eq!(s.actor(a).unwrap().experience(), 54);
}

#[test]
fn crit_chance_is_capped() {
    let mut s = Session::new(Dice::from_scripted(vec![39]));
    let a = s.new_actor(
        ActorSpec::controlled("Hero", Weapon::new("Rusty Sword", 10)).attributes(5, 5, 40),
    );
    let b = s.new_actor(ActorSpec::opponent("Goblin", Weapon::new("Club", 1)));
    let report = s.resolve_attack(a, b).unwrap();
    assert!(report.was_crit);
    assert_eq!(report.final_damage, 40);
    assert_eq!(s.actor(b).unwrap().hp(), 110);

    // 40 is past the cap even though 40 focus would give 200%
    let mut s = Session::new(Dice::from_scripted(vec![40]));
    let a = s.new_actor(
        ActorSpec::controlled("Hero", Weapon::new("Rusty Sword", 10)).attributes(5, 5, 40),
    );
    let b = s.new_actor(ActorSpec::opponent("Goblin", Weapon::new("Club", 1)));
    let report = s.resolve_attack(a, b).unwrap();
    assert!(!report.was_crit);
    assert_eq!(report.final_damage, 20);
}

#[test]
fn element_scaling_truncates() {
    let cases = [
        (Element::Fire, Element::Water, 10),
        (Element::Fire, Element::Earth, 31),
        (Element::Water, Element::Fire, 31),
        (Element::Earth, Element::Fire, 21),
        (Element::Water, Element::Earth, 21),
        (Element::Air, Element::Water, 21),
        (Element::Neutral, Element::Fire, 21),
        (Element::Fire, Element::Fire, 21),
    ];
    for (atk, def, expected) in cases {
        let mut s = Session::new(Dice::from_scripted(vec![]));
        // base damage 11 + 2×5 = 21
        let a = s.new_actor(ActorSpec::controlled("A", Weapon::new("Brand", 11)).element(atk));
        let b = s.new_actor(ActorSpec::opponent("B", Weapon::new("Club", 1)).element(def));
        let report = s.resolve_attack(a, b).unwrap();
        assert_eq!(report.final_damage, expected, "{atk} -> {def}");
        assert_eq!(s.actor(b).unwrap().hp(), 150 - expected, "{atk} -> {def}");
    }
}

#[test]
fn dodge_sets_off_a_counter() {
    // A: no crit. B: dodge, counter. Counter: no crit, A fails to dodge.
    let (mut s, a, b) = duelists(vec![99, 0, 0, 99, 99]);
    let report = s.resolve_attack(a, b).unwrap();

    assert!(report.was_dodged);
    assert_eq!(report.strikes.len(), 2);
    assert!(report.strikes[0].countered);
    let counter = &report.strikes[1];
    assert_eq!(counter.kind, StrikeKind::Counter);
    assert_eq!(counter.attacker, b);
    assert_eq!(counter.damage, 20);
    assert_eq!(s.actor(a).unwrap().hp(), 130);
    assert_eq!(s.actor(b).unwrap().hp(), 150);
}

#[test]
fn burn_still_rolls_when_the_attacker_falls_to_a_counter() {
    // A: no crit. B: dodge, counter. Counter: no crit, A fails to dodge and dies.
    // Then A's combo roll is spent without a strike, and the burn lands on B.
    let mut s = Session::new(Dice::from_scripted(vec![99, 0, 0, 99, 99, 0, 0]));
    let a = s.new_actor(ActorSpec::controlled("Hero", Weapon::new("Rusty Sword", 10)).health(15));
    let b = s.new_actor(ActorSpec::opponent("Goblin", Weapon::new("Rusty Sword", 10)));
    let report = s.resolve_attack(a, b).unwrap();

    assert_eq!(s.actor(a).unwrap().state(), LifeState::Dead);
    assert_eq!(report.strikes.len(), 2);
    assert!(report.strikes[1].killed);
    assert!(!report.strikes[0].combo);
    assert!(report.strikes[0].burned);
    assert!(!report.defender_died);

    let goblin = s.actor(b).unwrap();
    assert_eq!(goblin.hp(), 150);
    assert_eq!(goblin.effects().len(), 1);
    assert_eq!(s.living(), 1);
    assert_eq!(s.dice_mut().scripted_remaining(), Some(0));
}

#[test]
fn combo_strikes_again_and_burn_lands_on_the_last_strike() {
    // no crit, no dodge, combo | no crit, no dodge, no combo, burn | outer burn fails
    let (mut s, a, b) = duelists(vec![99, 99, 0, 99, 99, 99, 0, 99]);
    let report = s.resolve_attack(a, b).unwrap();

    assert_eq!(report.strikes.len(), 2);
    assert!(report.strikes[0].combo);
    assert!(!report.strikes[0].burned);
    assert_eq!(report.strikes[1].kind, StrikeKind::Combo);
    assert!(report.strikes[1].burned);

    let goblin = s.actor(b).unwrap();
    assert_eq!(goblin.hp(), 110);
    assert_eq!(goblin.effects().len(), 1);
    assert_eq!(s.dice_mut().scripted_remaining(), Some(0));
}

#[test]
fn long_combo_chains_do_not_grow_the_call_stack() {
    const COMBOS: usize = 20_000;
    let mut rolls = vec![99, 99];
    for _ in 0..COMBOS {
        rolls.extend([0, 99, 99]);
    }
    let mut s = Session::new(Dice::from_scripted(rolls));
    let a = s.new_actor(
        ActorSpec::controlled("Flurry", Weapon::new("Knife", 0)).attributes(1, 1, 5),
    );
    let b = s.new_actor(
        ActorSpec::opponent("Wall", Weapon::new("Club", 0)).attributes(100_000, 1, 1),
    );

    let report = s.resolve_attack(a, b).unwrap();

    assert_eq!(report.strikes.len(), COMBOS + 1);
    let wall = s.actor(b).unwrap();
    assert_eq!(wall.hp(), wall.max_hp() - 2 * (COMBOS as i32 + 1));
}

#[test]
fn rejected_attacks_draw_nothing() {
    // the kill: no crit, no dodge; then three rolls that would all succeed
    let mut s = Session::new(Dice::from_scripted(vec![99, 99, 0, 0, 0]));
    let a = s.new_actor(ActorSpec::controlled("Hero", Weapon::new("Rusty Sword", 10)).health(15));
    let b = s.new_actor(ActorSpec::opponent("Goblin", Weapon::new("Rusty Sword", 10)));
    s.resolve_attack(b, a).unwrap();
    assert!(!s.actor(a).unwrap().is_alive());
    assert_eq!(s.dice_mut().scripted_remaining(), Some(3));

    let err = s.resolve_attack(a, b).unwrap_err();
    assert!(matches!(err, Rejected::ActorDead { .. }));
    let err = s.resolve_attack(b, a).unwrap_err();
    assert!(matches!(err, Rejected::TargetDead { .. }));
    let err = s.resolve_attack(b, b).unwrap_err();
    assert!(matches!(err, Rejected::SelfTarget { .. }));

    assert_eq!(s.dice_mut().scripted_remaining(), Some(3));
    assert_eq!(s.actor(b).unwrap().hp(), 150);
    assert_eq!(s.actor(a).unwrap().hp(), 0);
    assert_eq!(s.living(), 1);
}

#[test]
fn damage_to_the_dead_is_ignored() {
    let mut s = Session::new(Dice::from_scripted(vec![]));
    let a = s.new_actor(ActorSpec::controlled("Hero", Weapon::new("Rusty Sword", 10)));
    let b = s.new_actor(ActorSpec::opponent("Goblin", Weapon::new("Club", 1)).health(5));
    s.resolve_attack(a, b).unwrap();
    assert_eq!(s.living(), 1);

    let report = s.receive_damage(b, 50, a).unwrap();
    assert_eq!(report.defense, Defense::Ignored);
    assert!(report.strikes.is_empty());
    assert_eq!(s.actor(b).unwrap().hp(), 0);
    assert_eq!(s.actor(b).unwrap().state(), LifeState::Dead);
    assert_eq!(s.living(), 1);
}

#[test]
fn receive_damage_on_its_own() {
    let (mut s, a, b) = duelists(vec![99]);
    let report = s.receive_damage(b, 35, a).unwrap();
    assert_eq!(report.defense, Defense::Hit { died: false });
    assert_eq!(s.actor(b).unwrap().hp(), 115);
    // a hit awards nothing outside a full attack
    assert_eq!(s.actor(a).unwrap().experience(), 0);
}
