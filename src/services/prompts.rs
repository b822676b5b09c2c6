//! Prompt text sent to the image and text models.
//!
//! The recipe prompt is a contract with the text model: it asks for a JSON
//! object with exactly `menu_name` and `instructions`. The model does not
//! always comply, so `RecipeClient` validates the reply.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeLanguage {
    Thai,
    English,
}

impl RecipeLanguage {
    pub fn from_string(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "thai" | "th" => Some(RecipeLanguage::Thai),
            "english" | "en" => Some(RecipeLanguage::English),
            _ => None,
        }
    }

    /// `menu_name` of the placeholder recipe returned when generation fails.
    pub fn error_sentinel(&self) -> &'static str {
        match self {
            RecipeLanguage::Thai => "เกิดข้อผิดพลาด",
            RecipeLanguage::English => "Error",
        }
    }
}

pub fn build_image_prompt(ingredients: &str, style: &str) -> String {
    format!(
        "A realistic, appetizing photo of a dish made with '{}'. \
         The dish is presented in the style of '{}'. \
         Highly detailed, professional food photography, warm lighting.",
        ingredients, style
    )
}

pub fn build_recipe_prompt(
    ingredients: &str,
    quantity: &str,
    style: &str,
    language: RecipeLanguage,
) -> String {
    match language {
        RecipeLanguage::Thai => format!(
            "ในฐานะเชฟมืออาชีพ, จงสร้างสรรค์เมนูอาหารที่ \"ทำได้จริง\" และน่ารับประทาน\n\
             โดยใช้วัตถุดิบ, ปริมาณ, และสไตล์ที่กำหนดให้ต่อไปนี้\n\
             \n\
             - วัตถุดิบ: {ingredients}\n\
             - ปริมาณ: {quantity}\n\
             - สไตล์: {style}\n\
             \n\
             ข้อกำหนด:\n\
             1. คิด \"ชื่อเมนู\" เป็นภาษาไทยที่สร้างสรรค์และน่าสนใจ\n\
             2. เขียน \"วิธีทำ\" เป็นภาษาไทยแบบทีละขั้นตอนที่เข้าใจง่ายและทำตามได้จริง\n\
             3. ตอบกลับในรูปแบบ JSON เท่านั้น โดยมีแค่ 2 keys คือ \"menu_name\" และ \"instructions\"\n\
             \n\
             ตัวอย่างผลลัพธ์ที่ต้องการ:\n\
             {{\n\
             \x20 \"menu_name\": \"หมูสามชั้นทอดน้ำปลาตะไคร้กรอบ\",\n\
             \x20 \"instructions\": \"1. หั่นหมูสามชั้นเป็นชิ้นพอดีคำ แล้วนำไปหมักกับน้ำปลาและพริกไทย 15 นาที\\n\
             2. ซอยตะไคร้แล้วนำไปทอดในน้ำมันร้อนจัดจนเหลืองกรอบ แล้วตักขึ้นพักไว้\\n\
             3. นำหมูที่หมักไว้ลงทอดในน้ำมันเดิมจนสุกเหลืองน่ารับประทาน\\n\
             4. จัดหมูทอดใส่จานแล้วโรยด้วยตะไคร้กรอบ\"\n\
             }}"
        ),
        RecipeLanguage::English => format!(
            "As a professional chef, create a dish that is practical to cook and appetizing,\n\
             using the following ingredients, quantity and style.\n\
             \n\
             - Ingredients: {ingredients}\n\
             - Quantity: {quantity}\n\
             - Style: {style}\n\
             \n\
             Requirements:\n\
             1. Invent a creative, appealing English \"menu name\".\n\
             2. Write step-by-step English \"instructions\" that are easy to follow.\n\
             3. Respond ONLY with JSON containing exactly 2 keys: \"menu_name\" and \"instructions\".\n\
             \n\
             Example:\n\
             {{\n\
             \x20 \"menu_name\": \"Crispy Lemongrass Pork Belly\",\n\
             \x20 \"instructions\": \"1. Cut the pork belly into bite-sized pieces and marinate with fish sauce and pepper for 15 minutes\\n\
             2. Slice the lemongrass and fry until golden, then set aside\\n\
             3. Fry the pork in the same oil until cooked through\\n\
             4. Plate the pork and top with the crispy lemongrass\"\n\
             }}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_prompt() {
        let prompt = build_image_prompt("กุ้ง, กระเทียม", "อาหารสตรีทฟู้ดเยาวราช");

        assert!(prompt.starts_with("A realistic, appetizing photo of a dish made with 'กุ้ง, กระเทียม'."));
        assert!(prompt.contains("in the style of 'อาหารสตรีทฟู้ดเยาวราช'"));
        assert!(prompt.ends_with("warm lighting."));
    }

    #[test]
    fn test_recipe_prompt_thai() {
        let prompt = build_recipe_prompt("ไข่", "2 คน", "", RecipeLanguage::Thai);

        assert!(prompt.contains("- วัตถุดิบ: ไข่"));
        assert!(prompt.contains("- ปริมาณ: 2 คน"));
        assert!(prompt.contains("\"menu_name\" และ \"instructions\""));
    }

    #[test]
    fn test_recipe_prompt_english() {
        let prompt = build_recipe_prompt("eggs", "2 servings", "brunch", RecipeLanguage::English);

        assert!(prompt.contains("- Ingredients: eggs"));
        assert!(prompt.contains("- Quantity: 2 servings"));
        assert!(prompt.contains("- Style: brunch"));
        assert!(prompt.contains("exactly 2 keys"));
    }

    #[test]
    fn test_language_from_string() {
        assert_eq!(RecipeLanguage::from_string("Thai"), Some(RecipeLanguage::Thai));
        assert_eq!(RecipeLanguage::from_string("en"), Some(RecipeLanguage::English));
        assert_eq!(RecipeLanguage::from_string("klingon"), None);
        assert_eq!(RecipeLanguage::Thai.error_sentinel(), "เกิดข้อผิดพลาด");
    }
}
