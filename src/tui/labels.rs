use crate::domain::Language;

/// Fixed interface text in one language. Product data is shown as the
/// backend sends it.
pub struct Labels {
    pub catalog: &'static str,
    pub details: &'static str,
    pub cart: &'static str,
    pub loading_more: &'static str,
    pub end_of_catalog: &'static str,
    pub no_products: &'static str,
    pub load_failed: &'static str,
    pub no_selection: &'static str,
    pub file_type: &'static str,
    pub added_on: &'static str,
    pub in_cart: &'static str,
    pub cart_empty: &'static str,
    pub total: &'static str,
    pub loading: &'static str,
    pub help: &'static str,
}

const ENGLISH: Labels = Labels {
    catalog: "Catalog",
    details: "Details",
    cart: "Cart",
    loading_more: "Loading more products...",
    end_of_catalog: "You've reached the end of the catalog",
    no_products: "No products available",
    load_failed: "Failed to load products. Press r to retry",
    no_selection: "No product selected",
    file_type: "Type",
    added_on: "Added",
    in_cart: "In your cart",
    cart_empty: "Your cart is empty",
    total: "Total",
    loading: "Loading...",
    help: "j/k:Nav  n/p:Page  a:Add  x:Remove  R:Refresh  r:Retry  q:Quit",
};

const HINDI: Labels = Labels {
    catalog: "सूची",
    details: "विवरण",
    cart: "कार्ट",
    loading_more: "और उत्पाद लोड हो रहे हैं...",
    end_of_catalog: "आप सूची के अंत तक पहुँच गए हैं",
    no_products: "कोई उत्पाद उपलब्ध नहीं है",
    load_failed: "उत्पाद लोड नहीं हो सके। दोबारा कोशिश के लिए r दबाएँ",
    no_selection: "कोई उत्पाद चुना नहीं गया",
    file_type: "प्रकार",
    added_on: "जोड़ा गया",
    in_cart: "आपके कार्ट में",
    cart_empty: "आपका कार्ट खाली है",
    total: "कुल",
    loading: "लोड हो रहा है...",
    help: "j/k:चलें  n/p:पेज  a:जोड़ें  x:हटाएँ  R:रीफ़्रेश  r:पुनः प्रयास  q:बाहर",
};

impl Labels {
    pub fn for_language(language: Language) -> &'static Labels {
        match language {
            Language::English => &ENGLISH,
            Language::Hindi => &HINDI,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_language_has_labels() {
        for language in Language::all() {
            let labels = Labels::for_language(language);
            assert!(!labels.catalog.is_empty());
            assert!(labels.load_failed.contains('r'));
        }
    }

    #[test]
    fn test_hindi_differs_from_english() {
        assert_ne!(
            Labels::for_language(Language::Hindi).cart_empty,
            Labels::for_language(Language::English).cart_empty
        );
    }
}
