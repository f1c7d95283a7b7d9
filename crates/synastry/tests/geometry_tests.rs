use synastry_core::chart::{
    build_house_cusps, degree_to_sign, midpoint_longitude, resolve_house, to_longitude,
    PlanetPosition, ZodiacSign,
};

fn position(sign: &str, degree: u8, minute: u8) -> PlanetPosition {
    PlanetPosition {
        name: "Moon".to_string(),
        sign: sign.to_string(),
        degree,
        minute,
        house: None,
        is_retrograde: false,
    }
}

#[test]
fn test_longitude_round_trip_all_signs() {
    for sign in ZodiacSign::ALL {
        for degree in [0u8, 1, 14, 29] {
            for minute in 0u8..60 {
                let p = position(sign.name(), degree, minute);
                let (s, d, m) = degree_to_sign(to_longitude(&p));
                assert_eq!((s, d, m), (sign, degree, minute), "{} {}°{}'", sign, degree, minute);
            }
        }
    }
}

#[test]
fn test_midpoint_of_identical_points() {
    let mut x = 0.0;
    while x < 360.0 {
        assert_eq!(midpoint_longitude(x, x), x);
        x += 7.25;
    }
}

#[test]
fn test_midpoint_always_in_range() {
    let samples = [0.0, 0.5, 45.0, 179.9, 180.0, 180.1, 270.0, 359.99];
    for a in samples {
        for b in samples {
            let mid = midpoint_longitude(a, b);
            assert!((0.0..360.0).contains(&mid), "midpoint({a}, {b}) = {mid}");
        }
    }
    assert_eq!(midpoint_longitude(350.0, 10.0), 0.0);
}

#[test]
fn test_house_wraparound_ascendant_355() {
    let cusps = build_house_cusps(355.0);
    assert_eq!(resolve_house(358.0, &cusps), Some(1));
    assert_eq!(resolve_house(10.0, &cusps), Some(1));
    assert_eq!(resolve_house(25.0, &cusps), Some(2));
    assert_eq!(resolve_house(354.9, &cusps), Some(12));
}

#[test]
fn test_ascendant_late_pisces() {
    // Pisces 29°40'
    let asc = to_longitude(&position("Pisces", 29, 40));
    let cusps = build_house_cusps(asc);
    assert!((cusps[0] - 359.67).abs() < 0.01);
    assert!((cusps[1] - 29.67).abs() < 0.01);

    let body = to_longitude(&position("Aries", 0, 10));
    assert_eq!(resolve_house(body, &cusps), Some(1));
}

#[test]
fn test_every_longitude_resolves_to_one_house() {
    let cusps = build_house_cusps(123.4);
    let mut lon = 0.0;
    while lon < 360.0 {
        let house = resolve_house(lon, &cusps);
        assert!(matches!(house, Some(1..=12)), "lon {lon} -> {house:?}");
        lon += 0.5;
    }
}

#[test]
fn test_midpoint_of_exact_opposition_follows_argument_order() {
    // both arcs are 180°; the midpoint is taken backwards from the first point
    assert_eq!(midpoint_longitude(0.0, 180.0), 270.0);
    assert_eq!(midpoint_longitude(180.0, 0.0), 90.0);
    assert_eq!(midpoint_longitude(90.0, 270.0), 0.0);
    assert_eq!(midpoint_longitude(270.0, 90.0), 180.0);
}
