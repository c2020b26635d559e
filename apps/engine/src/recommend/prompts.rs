// Prompt constants for the generative shortlist call.
// Reuses the cross-cutting JSON-only fragment from llm_client::prompts.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// System prompt for shortlist generation.
pub fn shortlist_system() -> String {
    format!(
        "{JSON_ONLY_SYSTEM} \
        You are an expert gift advisor. You suggest realistic, purchasable \
        gift ideas with plain, widely-used product names."
    )
}

/// Shortlist prompt template.
/// Replace: {count}, {relationship_summary}, {occasion}, {mood},
///          {budget_min}, {budget_max}, {interest_tags}
pub const SHORTLIST_PROMPT_TEMPLATE: &str = r#"Suggest exactly {count} gift ideas for this recipient.

RECIPIENT:
{relationship_summary}

OCCASION: {occasion}
MOOD: {mood}
BUDGET: between ${budget_min} and ${budget_max} (stay inside this range)
INTERESTS: {interest_tags}

Return a JSON ARRAY with this EXACT schema (no extra fields):
[
  {
    "name": "Pour-over coffee kit",
    "approximate_price": 45.0,
    "category": "food_beverage",
    "justification": "A hands-on upgrade for a daily coffee ritual"
  }
]

HARD RULES:
1. Exactly {count} items, ordered best first
2. `approximate_price` must fall inside the budget range
3. `category` must be a single lowercase word or snake_case phrase
4. `justification` is one sentence, written to the gift giver
5. Use common product names a shopping catalog would carry — no brands"#;
