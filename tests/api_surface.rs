use propcheck::prelude::*;

#[test]
fn prelude_compiles_and_exports_core() {
    let mut source = RandomSource::from_seed(42);
    let pairs = zip(&boolean(), &symbol().unwrap());
    let values = sample(&pairs, &mut source, 5, Size::MAX, 10).unwrap();
    assert_eq!(values.len(), 5);

    let catalog = Catalog::standard();
    let reference = GeneratorRef::call("integer", vec![serde_json::json!(1), serde_json::json!(3)]);
    let generator = catalog.resolve(&reference).unwrap();
    for value in sample(&generator, &mut source, 20, Size::MAX, 10).unwrap() {
        let n = value.as_i64().unwrap();
        assert!((1..=3).contains(&n));
    }

    let _ = date(&GenOptions::new()).unwrap();
    let _ = decimal(2, &GenOptions::between(0.0, 1.0)).unwrap();
    assert_eq!(5_u8.shrink().first(), Some(&0));
}
