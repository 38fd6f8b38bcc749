use skirmish::progression::{MAX_LEVEL_UPS_PER_AWARD, threshold};
use skirmish::{ActorSpec, Dice, LevelUp, Session, Upgrade, Weapon};

fn hero(rolls: Vec<u32>) -> (Session, skirmish::ActorId) {
    let mut s = Session::new(Dice::from_scripted(rolls));
    let id = s.new_actor(ActorSpec::controlled("Hero", Weapon::new("Rusty Sword", 10)));
    (s, id)
}

#[test]
fn exact_threshold_levels_once() {
    let (mut s, id) = hero(vec![0]);
    let ups = s.gain_experience(id, 100).unwrap();
    assert_eq!(
        ups,
        vec![LevelUp {
            level: 2,
            upgrade: Upgrade::Strength
        }]
    );

    let h = s.actor(id).unwrap();
    assert_eq!(h.level(), 2);
    assert_eq!(h.experience(), 0);
    assert_eq!(h.attributes().strength, 6);
    assert_eq!(h.max_hp(), 160);
    assert_eq!(h.base_damage(), 22);
    // 150 + 20, capped at the new max
    assert_eq!(h.hp(), 160);
}

#[test]
fn one_short_of_threshold_banks() {
    let (mut s, id) = hero(vec![]);
    assert!(s.gain_experience(id, 99).unwrap().is_empty());
    assert_eq!(s.actor(id).unwrap().experience(), 99);
    assert_eq!(s.actor(id).unwrap().level(), 1);
}

#[test]
fn large_award_levels_repeatedly() {
    // 100 to leave level 1, 200 to leave level 2
    let (mut s, id) = hero(vec![1, 3]);
    let ups = s.gain_experience(id, threshold(1) + threshold(2)).unwrap();
    assert_eq!(ups.len(), 2);
    assert_eq!(ups[0].upgrade, Upgrade::Dexterity);
    assert_eq!(ups[1].upgrade, Upgrade::Vitality);

    let h = s.actor(id).unwrap();
    assert_eq!(h.level(), 3);
    assert_eq!(h.experience(), 0);
    assert_eq!(h.attributes().dexterity, 6);
    assert_eq!(h.max_hp(), 160);
    assert_eq!(h.hp(), 160);
}

#[test]
fn level_up_heal_does_not_overfill() {
    let mut s = Session::new(Dice::from_scripted(vec![1]));
    let id = s.new_actor(ActorSpec::controlled("Hero", Weapon::new("Rusty Sword", 10)).health(140));
    s.gain_experience(id, 100).unwrap();
    assert_eq!(s.actor(id).unwrap().hp(), 150);
}

#[test]
fn runaway_award_is_capped_per_call() {
    let (mut s, id) = hero(vec![]);
    let ups = s.gain_experience(id, u64::MAX).unwrap();
    assert_eq!(ups.len() as u32, MAX_LEVEL_UPS_PER_AWARD);
    let h = s.actor(id).unwrap();
    assert_eq!(h.level(), MAX_LEVEL_UPS_PER_AWARD + 1);
    assert!(h.experience() >= threshold(h.level()));
}

#[test]
fn the_dead_gain_nothing() {
    let mut s = Session::new(Dice::from_scripted(vec![]));
    let a = s.new_actor(ActorSpec::controlled("Hero", Weapon::new("Rusty Sword", 10)));
    let b = s.new_actor(ActorSpec::opponent("Goblin", Weapon::new("Club", 1)).health(1));
    s.resolve_attack(a, b).unwrap();

    assert!(s.gain_experience(b, 500).unwrap().is_empty());
    assert_eq!(s.actor(b).unwrap().experience(), 0);
    assert_eq!(s.actor(b).unwrap().level(), 1);
}
