//! Map search over a small grower set.
//!
//! Grower A sits in Prague with tomatoes, grower B has no location and sells
//! carrots, grower C is near Beroun (~21 km away) with honey and eggs, grower D
//! was registered with a `(0, 0)` location and sells tomatoes too.

use rust_decimal::Decimal;
use testresult::TestResult;

use pestitele::prelude::*;

struct Fixture {
    growers: Vec<Grower>,
    products: Vec<Product>,
    catalog: Vec<PredefinedProduct>,
}

fn grower(name: &str, city: &str, at: Option<(f64, f64)>) -> Grower {
    Grower {
        id: GrowerId::new(),
        name: name.to_string(),
        city: city.to_string(),
        description: None,
        phone: "777000111".to_string(),
        email: None,
        gps_lat: at.map(|(lat, _)| lat),
        gps_lng: at.map(|(_, lng)| lng),
    }
}

fn product(grower: &Grower, name: &str, category: Category) -> Product {
    Product {
        id: ProductId::new(),
        grower_id: grower.id,
        name: name.to_string(),
        description: None,
        price: Decimal::from(40),
        unit: Unit::Kilogram,
        available: true,
        photo: None,
        category,
    }
}

fn template(name: &str, category: Category) -> PredefinedProduct {
    PredefinedProduct {
        id: PredefinedProductId::new(),
        name: name.to_string(),
        emoji: String::new(),
        category,
    }
}

fn fixture() -> Fixture {
    let a = grower("Zahrada Novákových", "Praha", Some((50.08, 14.44)));
    let b = grower("Statek Bez Mapy", "Kolín", None);
    let c = grower("Včelařství Beroun", "Beroun", Some((49.99, 14.20)));
    let d = grower("Nulový Ostrov", "Neznámo", Some((0.0, 0.0)));

    let products = vec![
        product(&a, "Rajčata", Category::Vegetables),
        product(&b, "Mrkev", Category::Vegetables),
        product(&c, "Med", Category::Honey),
        product(&c, "Vejce", Category::Eggs),
        product(&d, "Rajčata cherry", Category::Vegetables),
    ];

    Fixture {
        growers: vec![a, b, c, d],
        products,
        catalog: vec![
            template("Rajčata", Category::Vegetables),
            template("Med", Category::Honey),
        ],
    }
}

fn user() -> Option<Coordinates> {
    Some(Coordinates::new(50.09, 14.45))
}

fn names(found: &[DiscoveredGrower]) -> Vec<&str> {
    found.iter().map(|found| found.grower.grower.name.as_str()).collect()
}

#[test]
fn query_and_bound_select_the_nearby_tomato_grower() -> TestResult {
    let fixture = fixture();
    let enriched = join_products_to_growers(fixture.growers, &fixture.products);
    let filter = DiscoveryFilter::new()
        .with_query("rajč")
        .with_max_distance(DistanceLimit::Km10);

    let found = discover(enriched, user(), &filter, &fixture.catalog);

    assert_eq!(names(&found), ["Zahrada Novákových", "Nulový Ostrov"]);

    let distance = found
        .first()
        .and_then(|found| found.distance_km)
        .ok_or("A should have a distance")?;
    assert!((1.0..1.5).contains(&distance), "distance was {distance}");

    Ok(())
}

#[test]
fn zero_location_never_gets_a_distance_or_sorts_first() {
    let fixture = fixture();
    let enriched = join_products_to_growers(fixture.growers, &fixture.products);

    let found = discover(enriched, user(), &DiscoveryFilter::new(), &fixture.catalog);

    assert_eq!(
        names(&found),
        [
            "Zahrada Novákových",
            "Včelařství Beroun",
            "Statek Bez Mapy",
            "Nulový Ostrov",
        ]
    );
    assert!(found.iter().skip(2).all(|found| found.distance_km.is_none()));
}

#[test]
fn tightening_the_bound_never_grows_the_result() {
    let fixture = fixture();
    let enriched = join_products_to_growers(fixture.growers, &fixture.products);

    let sizes: Vec<usize> = DistanceLimit::ALL
        .into_iter()
        .rev()
        .map(|limit| {
            let filter = DiscoveryFilter::new().with_max_distance(limit);

            discover(enriched.clone(), user(), &filter, &fixture.catalog).len()
        })
        .collect();

    assert!(
        sizes.windows(2).all(|pair| pair.first() >= pair.get(1)),
        "sizes from unlimited down to 5 km: {sizes:?}"
    );
}

#[test]
fn category_selection_matches_product_names_both_ways() -> TestResult {
    let fixture = fixture();
    let honey = fixture
        .catalog
        .iter()
        .find(|template| template.name == "Med")
        .ok_or("catalog has honey")?
        .id;
    let enriched = join_products_to_growers(fixture.growers, &fixture.products);

    let found = discover(
        enriched,
        user(),
        &DiscoveryFilter::new().with_category(honey),
        &fixture.catalog,
    );

    assert_eq!(names(&found), ["Včelařství Beroun"]);

    Ok(())
}

#[test]
fn without_user_location_everyone_keeps_input_order() {
    let fixture = fixture();
    let enriched = join_products_to_growers(fixture.growers, &fixture.products);

    let found = discover(
        enriched,
        None,
        &DiscoveryFilter::new().with_max_distance(DistanceLimit::Km5),
        &fixture.catalog,
    );

    assert_eq!(found.len(), 4);
    assert_eq!(
        found.first().map(|found| found.grower.grower.name.as_str()),
        Some("Zahrada Novákových")
    );
    assert!(found.iter().all(|found| found.distance_km.is_none()));
}
