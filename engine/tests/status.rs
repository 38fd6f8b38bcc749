use skirmish::status::{BURN_DAMAGE, BURN_TICKS};
use skirmish::{ActorSpec, Dice, EffectKind, Session, TickReport, Weapon};

/// Hero lands a hit that sets the goblin on fire; every later roll fails.
fn burning_goblin() -> (Session, skirmish::ActorId, skirmish::ActorId) {
    let mut s = Session::new(Dice::from_scripted(vec![99, 99, 99, 0]));
    let a = s.new_actor(ActorSpec::controlled("Hero", Weapon::new("Rusty Sword", 10)));
    let b = s.new_actor(ActorSpec::opponent("Goblin", Weapon::new("Club", 1)));
    let report = s.resolve_attack(a, b).unwrap();
    assert!(report.strikes[0].burned);
    (s, a, b)
}

#[test]
fn burn_ticks_three_times_then_wears_off() {
    let (mut s, _, b) = burning_goblin();
    assert_eq!(s.actor(b).unwrap().hp(), 130);
    assert_eq!(s.actor(b).unwrap().effects().count(EffectKind::Burn), 1);

    for tick in 1..=BURN_TICKS as i32 {
        let report = s.tick_effects(b);
        assert_eq!(
            report,
            TickReport {
                damage: BURN_DAMAGE,
                died: false
            }
        );
        assert_eq!(s.actor(b).unwrap().hp(), 130 - tick * BURN_DAMAGE);
    }
    assert!(s.actor(b).unwrap().effects().is_empty());
    assert_eq!(s.tick_effects(b), TickReport::default());
    assert_eq!(s.actor(b).unwrap().hp(), 115);
}

#[test]
fn stacks_add_up() {
    let (mut s, a, b) = burning_goblin();
    // second hit: no crit, no dodge, no combo, burn
    *s.dice_mut() = Dice::from_scripted(vec![99, 99, 99, 0]);
    s.resolve_attack(a, b).unwrap();
    assert_eq!(s.actor(b).unwrap().effects().len(), 2);

    let report = s.tick_effects(b);
    assert_eq!(report.damage, 2 * BURN_DAMAGE);
    assert_eq!(s.actor(b).unwrap().hp(), 110 - 2 * BURN_DAMAGE);
}

#[test]
fn burning_to_death_updates_the_counter() {
    let (mut s, a, b) = burning_goblin();
    *s.dice_mut() = Dice::from_scripted(vec![]);
    // wear the goblin down to a sliver
    s.receive_damage(b, 127, a).unwrap();
    assert_eq!(s.actor(b).unwrap().hp(), 3);
    assert_eq!(s.living(), 2);

    let report = s.tick_effects(b);
    assert!(report.died);
    assert_eq!(s.actor(b).unwrap().hp(), 0);
    assert_eq!(s.living(), 1);

    // the dead are not ticked
    assert_eq!(s.tick_effects(b), TickReport::default());
    assert_eq!(s.living(), 1);
}

#[test]
fn ignite_and_tick_share_one_journal_tag() {
    let (mut s, _, b) = burning_goblin();
    s.tick_effects(b);
    let journal = s.journal();
    assert!(journal.iter().any(|l| l.starts_with("[BURN][Goblin] catches fire")));
    assert!(journal.iter().any(|l| l == "[BURN][Goblin] 5 damage (2 ticks left)"));
    assert!(!journal.iter().any(|l| l.starts_with("[Burn]")));
}
