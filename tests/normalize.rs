use foodlens::nlp::normalize;
use proptest::prelude::*;

#[test]
fn turkish_header_folds_to_lowercase_form() {
    assert_eq!(normalize("İÇİNDEKİLER"), normalize("içindekiler"));
    assert_eq!(normalize("İÇİNDEKİLER"), "içindekiler");
}

#[test]
fn dotless_and_dotted_i_stay_distinct() {
    assert_eq!(normalize("I"), normalize("ı"));
    assert_eq!(normalize("İ"), normalize("i"));
    assert_ne!(normalize("I"), normalize("i"));
    assert_ne!(normalize("ı"), normalize("İ"));
}

#[test]
fn other_turkish_letters_fold_consistently() {
    assert_eq!(normalize("ĞÜŞÖÇ"), "ğüşöç");
    assert_eq!(normalize("MISIR ŞURUBU"), normalize("mısır şurubu"));
}

#[test]
fn asides_and_punctuation_are_removed() {
    assert_eq!(normalize("Soya Lesitini (E322)."), "soya lesitini");
    assert_eq!(normalize("sitrik asit,\n[asitlik düzenleyici]"), "sitrik asit");
}

proptest! {
    #[test]
    fn normalization_is_idempotent(s in "\\PC{0,40}") {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn label_like_text_is_idempotent(s in "[A-Za-zİIıiŞşĞğÜüÖöÇç0-9 .,:()\\[\\]{}\\n-]{0,60}") {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once);
    }
}
