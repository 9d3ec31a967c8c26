use super::escape_html;
use crate::surface::{MemoryDocument, Region};

fn json_for_script_tag(value: &str) -> String {
    value.replace("</", "<\\/")
}

fn hidden_class(doc: &MemoryDocument, region: Region) -> &'static str {
    if doc.is_visible(region) {
        ""
    } else {
        " hidden"
    }
}

/// Serializes the current state of `doc` as a standalone HTML page.
pub fn render_document(doc: &MemoryDocument) -> String {
    let json = serde_json::to_string(doc.items()).unwrap_or_else(|_| "[]".to_string());
    let json = json_for_script_tag(&json);
    let listing: String = doc.items().iter().map(|item| item.to_html()).collect();

    format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>Promotions</title>
  <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-50 text-gray-900 min-h-screen">
  <script type="application/json" id="listing-data">{json}</script>
  <main class="max-w-[1280px] mx-auto w-full px-4 md:px-8 py-10">
    <h1 class="text-2xl font-bold mb-8">Promotions</h1>

    <div id="{initial_id}" class="flex justify-center py-20{initial_hidden}">
      <div class="w-10 h-10 border-4 border-gray-200 border-t-blue-500 rounded-full animate-spin"></div>
    </div>

    <div id="{error_id}" class="text-center text-red-500 py-10{error_hidden}">{error_text}</div>

    <div id="{listing_id}" class="grid grid-cols-1 sm:grid-cols-2 md:grid-cols-3 lg:grid-cols-4 gap-x-6 gap-y-8{listing_hidden}">
{listing}    </div>

    <div id="{mini_id}" class="flex justify-center py-8{mini_hidden}">
      <div class="w-6 h-6 border-2 border-gray-200 border-t-blue-500 rounded-full animate-spin"></div>
    </div>
  </main>
</body>
</html>
"####,
        initial_id = Region::InitialLoader.element_id(),
        initial_hidden = hidden_class(doc, Region::InitialLoader),
        error_id = Region::ErrorMessage.element_id(),
        error_hidden = hidden_class(doc, Region::ErrorMessage),
        error_text = escape_html(doc.error_text()),
        listing_id = Region::Listing.element_id(),
        listing_hidden = hidden_class(doc, Region::Listing),
        mini_id = Region::MiniLoader.element_id(),
        mini_hidden = hidden_class(doc, Region::MiniLoader),
    )
}
