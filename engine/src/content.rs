use indexmap::IndexMap;

pub fn builtin_opponents() -> IndexMap<&'static str, &'static str> {
    IndexMap::from([
        (
            "goblin_brute",
            include_str!("../content/opponents/goblin_brute.json"),
        ),
        (
            "goblin_skirmisher",
            include_str!("../content/opponents/goblin_skirmisher.json"),
        ),
        (
            "cave_boss",
            include_str!("../content/opponents/cave_boss.json"),
        ),
    ])
}

pub fn builtin_encounters() -> IndexMap<&'static str, &'static str> {
    IndexMap::from([
        (
            "cave_mouth",
            include_str!("../content/encounters/cave_mouth.json"),
        ),
        (
            "treasure_hall",
            include_str!("../content/encounters/treasure_hall.json"),
        ),
        (
            "throne_room",
            include_str!("../content/encounters/throne_room.json"),
        ),
    ])
}
