use apart_core::index::{FitOptions, TfidfModel};
use apart_core::recommend::recommend_from_scores;
use apart_core::{Facilities, FilterRange, Listing, PreferenceForm, RecommendationRequest, Recommender};

fn listing(id: &str, price: f64, rating: f64, size: f64, description: &str) -> Listing {
    Listing {
        id: id.into(),
        name: format!("Apartemen {id}"),
        images: vec![format!("https://img.example.com/{id}.jpg")],
        detail_url: format!("https://example.com/apart/{id}"),
        description: description.into(),
        location: "Jakarta Selatan".into(),
        address: "Jl. Kemang Raya".into(),
        price,
        rating,
        size,
    }
}

fn three_listings() -> Vec<Listing> {
    vec![
        listing("a", 4_000_000.0, 4.5, 30.0, "dekat kampus wifi"),
        listing("b", 2_500_000.0, 4.0, 24.0, "kolam renang gym"),
        listing("c", 6_000_000.0, 3.5, 40.0, "dekat mall"),
    ]
}

fn covering_filters() -> FilterRange {
    FilterRange {
        min_price: 0.0,
        max_price: 10_000_000.0,
        min_rating: 0.0,
        max_rating: 5.0,
        min_size: 0.0,
        max_size: 100.0,
    }
}

#[test]
fn top_two_of_three() {
    let listings = three_listings();
    let out = recommend_from_scores(&listings, &[0.9, 0.5, 0.1], &covering_filters(), 2).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].id, "a");
    assert_eq!(out[1].id, "b");
    assert!((out[0].cbf_score - 0.9).abs() < 1e-12);
    assert!((out[1].cbf_score - 0.5).abs() < 1e-12);
    assert!((out[0].similarity_percent - 90.0).abs() < 1e-9);
    assert!((out[1].similarity_percent - 50.0).abs() < 1e-9);
    assert!(out[0].cbf_score_scaled < 5.0 && out[0].cbf_score_scaled > 4.99);
}

#[test]
fn price_floor_excludes_cheapest_regardless_of_score() {
    let listings = three_listings();
    let filters = FilterRange { min_price: 3_000_000.0, ..covering_filters() };
    // the cheapest listing ("b") carries the best score
    let out = recommend_from_scores(&listings, &[0.1, 0.9, 0.5], &filters, 10).unwrap();
    let ids: Vec<String> = out.iter().map(|r| r.id.to_string()).collect();
    assert_eq!(ids, vec!["c", "a"]);
}

#[test]
fn scaling_uses_unfiltered_basis() {
    let listings = three_listings();
    let filters = FilterRange { min_price: 3_000_000.0, ..covering_filters() };
    let out = recommend_from_scores(&listings, &[0.9, 0.5, 0.1], &filters, 10).unwrap();
    // "c" holds the global minimum and still scales to 1 even though "b" was filtered out
    let c = out.iter().find(|r| r.id == "c").unwrap();
    assert!((c.cbf_score_scaled - 1.0).abs() < 1e-12);
}

#[test]
fn top_n_beyond_available_returns_all() {
    let listings = three_listings();
    let out = recommend_from_scores(&listings, &[0.3, 0.2, 0.1], &covering_filters(), 100).unwrap();
    assert_eq!(out.len(), 3);
}

#[test]
fn top_n_zero_returns_nothing() {
    let listings = three_listings();
    let out = recommend_from_scores(&listings, &[0.3, 0.2, 0.1], &covering_filters(), 0).unwrap();
    assert!(out.is_empty());
}

fn recommender() -> Recommender {
    let listings = three_listings();
    let docs: Vec<&str> = listings.iter().map(|l| l.description.as_str()).collect();
    let (model, matrix) = TfidfModel::fit_transform(&docs, &FitOptions::default());
    Recommender::new(listings, model, matrix).unwrap()
}

fn request(form: PreferenceForm, top_n: Option<usize>) -> RecommendationRequest {
    RecommendationRequest { user_form: form, filters: covering_filters(), top_n }
}

#[test]
fn form_terms_drive_the_ranking() {
    let rec = recommender();
    let form = PreferenceForm {
        tipe_lokasi: vec!["kampus".into()],
        tipe_kamar_tidur: "2_BR".into(),
        facilities: Facilities { utility: Some(vec!["wifi".into()]), ..Default::default() },
        ..Default::default()
    };
    let out = rec.recommend(&request(form, None)).unwrap();
    assert_eq!(out.len(), 3);
    assert_eq!(out[0].id, "a");
    assert!(out.windows(2).all(|w| w[0].cbf_score >= w[1].cbf_score));
    assert!(out[0].cbf_score > 0.0 && out[0].cbf_score <= 1.0 + 1e-9);
}

#[test]
fn unknown_vocabulary_scores_zero_everywhere() {
    let rec = recommender();
    let scores = rec.scores("xyzzy penthouse helipad").unwrap();
    assert_eq!(scores, vec![0.0, 0.0, 0.0]);

    let form = PreferenceForm { tipe_lokasi: vec!["helipad".into()], ..Default::default() };
    let out = rec.recommend(&request(form, Some(10))).unwrap();
    assert_eq!(out.len(), 3);
    for r in &out {
        assert_eq!(r.cbf_score, 0.0);
        assert!((r.cbf_score_scaled - 1.0).abs() < 1e-12);
    }
    // all tied, dataset order kept
    let ids: Vec<String> = out.iter().map(|r| r.id.to_string()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[test]
fn empty_form_is_not_an_error() {
    let rec = recommender();
    let out = rec.recommend(&request(PreferenceForm::default(), Some(2))).unwrap();
    assert_eq!(out.len(), 2);
}
