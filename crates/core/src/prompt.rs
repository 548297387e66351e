//! Prompt assembly for the gateway's text and image models.

use crate::dish::Dish;
use crate::style::ImageStyle;

/// Build the instruction sent to the text model to extract dishes from
/// raw menu text. Prices and category headings are deliberately dropped;
/// the structured output schema pins the response shape.
pub fn parse_menu_prompt(menu_text: &str) -> String {
    format!(
        "Parse the following restaurant menu text and extract a list of dishes \
         with their names and descriptions. Ignore prices and categories. \
         Here is the menu: \n\n{menu_text}"
    )
}

/// Build the synthesis prompt for one dish in the given style.
pub fn generation_prompt(dish: &Dish, style: ImageStyle) -> String {
    format!(
        "A high-resolution, realistic photograph of {}: {}. Style: {}.",
        dish.name,
        dish.description,
        style.prompt_fragment()
    )
}
