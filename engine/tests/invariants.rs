use proptest::prelude::*;
use skirmish::{ActorId, ActorSpec, Element, LifeState, Session, Weapon};

fn element() -> impl Strategy<Value = Element> {
    prop::sample::select(Element::ALL.to_vec())
}

fn actor_spec() -> impl Strategy<Value = ActorSpec> {
    (1u32..12, 1u32..12, 1u32..12, 0u32..40, element(), 1i32..200).prop_map(
        |(s, d, f, dmg, el, hp)| {
            ActorSpec::opponent("Brawler", Weapon::new("Fist", dmg))
                .attributes(s, d, f)
                .element(el)
                .health(hp)
                .potions(1)
        },
    )
}

#[derive(Debug, Clone)]
enum Move {
    Attack(usize, usize),
    Shield(usize, usize),
    Tick(usize),
    Heal(usize),
}

fn a_move() -> impl Strategy<Value = Move> {
    prop_oneof![
        4 => (0usize..5, 0usize..5).prop_map(|(a, d)| Move::Attack(a, d)),
        1 => (0usize..5, 0usize..5).prop_map(|(a, d)| Move::Shield(a, d)),
        2 => (0usize..5).prop_map(Move::Tick),
        1 => (0usize..5).prop_map(Move::Heal),
    ]
}

fn check(s: &Session, ids: &[ActorId]) -> Result<(), TestCaseError> {
    let mut alive = 0;
    for &id in ids {
        let a = s.actor(id).unwrap();
        prop_assert!(a.hp() >= 0 && a.hp() <= a.max_hp(), "{} out of bounds", a.hp());
        prop_assert_eq!(a.hp() == 0, a.state() == LifeState::Dead);
        if a.is_alive() {
            alive += 1;
        }
    }
    prop_assert_eq!(s.living(), alive);
    Ok(())
}

proptest! {
    #[test]
    fn health_and_live_count_stay_consistent(
        seed in any::<u64>(),
        specs in prop::collection::vec(actor_spec(), 2..5),
        moves in prop::collection::vec(a_move(), 1..60),
    ) {
        let mut s = Session::from_seed(seed);
        let ids: Vec<ActorId> = specs.into_iter().map(|spec| s.new_actor(spec)).collect();
        let n = ids.len();
        check(&s, &ids)?;

        for m in moves {
            match m {
                Move::Attack(a, d) => {
                    let (a, d) = (ids[a % n], ids[d % n]);
                    let before: Vec<i32> = ids.iter().map(|&i| s.actor(i).unwrap().hp()).collect();
                    let dead_attacker = !s.actor(a).unwrap().is_alive();
                    let res = s.resolve_attack(a, d);
                    if dead_attacker {
                        prop_assert!(res.is_err());
                        let after: Vec<i32> =
                            ids.iter().map(|&i| s.actor(i).unwrap().hp()).collect();
                        prop_assert_eq!(before, after);
                    }
                }
                Move::Shield(a, d) => {
                    let a = ids[a % n];
                    let dex = s.actor(a).unwrap().attributes().dexterity;
                    let _ = s.shield_attack(a, ids[d % n]);
                    prop_assert_eq!(s.actor(a).unwrap().attributes().dexterity, dex);
                }
                Move::Tick(i) => {
                    s.tick_effects(ids[i % n]);
                }
                Move::Heal(i) => {
                    s.heal(ids[i % n]);
                }
            }
            check(&s, &ids)?;
        }
    }
}
