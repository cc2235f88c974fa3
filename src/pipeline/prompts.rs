// Fixed prompt templates
// Author: kelexine (https://github.com/kelexine)

use crate::config::AnalysisTemplate;

/// Placeholder marking where the image sits in the prompt text.
pub const IMAGE_PLACEHOLDER: &str = "{{IMAGE}}";

/// A process-wide prompt: role priming plus a body with one image slot.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub system: &'static str,
    pub body: &'static str,
}

impl PromptTemplate {
    /// The image is sent as its own request part, so the slot renders empty.
    pub fn render(&self) -> String {
        self.body.replace(IMAGE_PLACEHOLDER, "")
    }

    pub fn for_analysis(kind: AnalysisTemplate) -> Self {
        match kind {
            AnalysisTemplate::Detailed => FOOD_ANALYSIS_DETAILED,
            AnalysisTemplate::Brief => FOOD_ANALYSIS_BRIEF,
        }
    }
}

/// Section headings the food analysis answer must contain, in order.
pub const FOOD_ANALYSIS_SECTIONS: [&str; 5] = [
    "Název jídla:",
    "Kalorická hodnota:",
    "Poznámky:",
    "Zdravotní benefity:",
    "Zdravotní rizika:",
];

const FOOD_SYSTEM: &str = "Jsi expert na analýzu jídla a kalorických hodnot.";

pub const FOOD_ANALYSIS_DETAILED: PromptTemplate = PromptTemplate {
    name: "food-analysis-detailed",
    system: FOOD_SYSTEM,
    body: r#"Jsi zkušený odborník na analýzu jídla a výživu. Tvým úkolem je analyzovat fotografii jídla a poskytnout detailní informace o něm. Zde je fotografie jídla, kterou budeš analyzovat:

<fotografie_jidla>
{{IMAGE}}
</fotografie_jidla>

Pečlivě si prohlédni všechny detaily zobrazené na fotografii. Zaměř se na ingredience, způsob přípravy, velikost porce a celkový vzhled jídla.

Před poskytnutím konečné odpovědi proveď důkladnou analýzu v následujících krocích.

1. Popis jídla:
   - Popiš, co vidíš na fotografii, včetně textury, barvy a prezentace
   - Identifikuj hlavní ingredience
   - Odhadni způsob přípravy
   - Odhadni přesnou velikost porce

2. Kulturní kontext:
   - Zvaž možný původ jídla a jeho kulturní význam
   - Navrhni potenciální variace tohoto jídla

3. Návrh názvu:
   - Na základě pozorování navrhni vhodný český název pro toto jídlo
   - Ujisti se, že název je výstižný a popisný

4. Odhad kalorické hodnoty:
   - Zvaž viditelné ingredience a jejich přibližné množství
   - Vezmi v úvahu odhadnutou velikost porce
   - Odhadni přibližnou kalorickou hodnotu a zdůvodni svůj odhad

5. Základní informace:
   - Shrň klíčové informace o jídle (např. původ, typické použití, variace)

6. Zdravotní benefity:
   - Identifikuj potenciální pozitivní účinky jídla na zdraví
   - Zvaž nutriční hodnotu jednotlivých ingrediencí

7. Zdravotní rizika:
   - Zvaž možná zdravotní rizika spojená s konzumací tohoto jídla
   - Vezmi v úvahu alergeny, vysoký obsah tuku nebo cukru, apod.

Na základě své analýzy nyní poskytni strukturovanou odpověď v následujícím formátu:

Název jídla:
[Navržený název jídla v češtině]

Kalorická hodnota:
[Odhadovaná kalorická hodnota jídla v češtině, včetně zdůvodnění odhadu]

Poznámky:
[Základní informace o jídle]

Zdravotní benefity:
[Seznam potenciálních pozitivních účinků na zdraví]

Zdravotní rizika:
[Seznam možných zdravotních rizik]

Ujisti se, že tvá odpověď je v češtině a obsahuje všechny požadované sekce. Buď konkrétní a výstižný ve svých popisech a odhadech.
"#,
};

pub const FOOD_ANALYSIS_BRIEF: PromptTemplate = PromptTemplate {
    name: "food-analysis-brief",
    system: FOOD_SYSTEM,
    body: r#"Analyzuj přiloženou fotografii jídla.

<fotografie_jidla>
{{IMAGE}}
</fotografie_jidla>

Urči jídlo, jeho hlavní ingredience a velikost porce. Potom odpověz česky přesně v tomto formátu:

Název jídla:
[Český název jídla]

Kalorická hodnota:
[Odhad v kcal se stručným zdůvodněním]

Poznámky:
[Původ, typická příprava a variace]

Zdravotní benefity:
[Seznam pozitivních účinků]

Zdravotní rizika:
[Seznam rizik včetně alergenů]
"#,
};

pub const STUDIO_PORTRAIT: PromptTemplate = PromptTemplate {
    name: "studio-portrait",
    system: "You are a professional portrait photographer and retoucher.",
    body: r#"Transform the person in the attached photo into a professional studio portrait.

<portrait_photo>
{{IMAGE}}
</portrait_photo>

Requirements:
- Keep the person's identity, facial features, hairstyle and expression recognisable.
- Replace the background with a clean, softly lit neutral studio backdrop.
- Use flattering three-point studio lighting with soft shadows.
- Keep clothing natural; tidy small distractions but do not change the outfit.
- Frame as a head-and-shoulders portrait with sharp focus on the eyes.

Return the finished portrait as an image and add one short sentence describing what you changed.
"#,
};
