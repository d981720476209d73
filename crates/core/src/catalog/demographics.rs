//! Population distributions (Houston-area pediatric catchment).

use crate::sampling::Weighted;

/// Age weights, skewed toward younger patients.
pub const AGE_WEIGHTS: [Weighted<u32>; 22] = [
    (0, 8.0),
    (1, 7.0),
    (2, 6.0),
    (3, 5.0),
    (4, 5.0),
    (5, 4.0),
    (6, 4.0),
    (7, 4.0),
    (8, 4.0),
    (9, 4.0),
    (10, 3.0),
    (11, 3.0),
    (12, 3.0),
    (13, 3.0),
    (14, 3.0),
    (15, 3.0),
    (16, 3.0),
    (17, 3.0),
    (18, 2.0),
    (19, 2.0),
    (20, 2.0),
    (21, 2.0),
];

pub const MAX_AGE: u32 = 21;

/// Age at which the adult insurance table applies.
pub const ADULT_INSURANCE_AGE: u32 = 18;

pub const RACES: [Weighted<&str>; 7] = [
    ("White", 0.35),
    ("Black or African American", 0.22),
    ("Asian", 0.07),
    ("American Indian", 0.01),
    ("Pacific Islander", 0.01),
    ("Other", 0.25),
    ("Unknown", 0.09),
];

pub const HISPANIC_OR_LATINO: &str = "Hispanic or Latino";

pub const ETHNICITIES: [Weighted<&str>; 3] = [
    (HISPANIC_OR_LATINO, 0.44),
    ("Not Hispanic or Latino", 0.51),
    ("Unknown", 0.05),
];

pub const PEDIATRIC_INSURANCE: [Weighted<&str>; 5] = [
    ("Medicaid", 0.45),
    ("Commercial", 0.40),
    ("CHIP", 0.10),
    ("Self-pay", 0.03),
    ("Other", 0.02),
];

pub const YOUNG_ADULT_INSURANCE: [Weighted<&str>; 4] = [
    ("Commercial", 0.60),
    ("Medicaid", 0.25),
    ("Self-pay", 0.12),
    ("Other", 0.03),
];

pub const HISPANIC_LANGUAGES: [Weighted<&str>; 2] = [("Spanish", 0.7), ("English", 0.3)];

pub const OTHER_LANGUAGES: [Weighted<&str>; 3] =
    [("English", 0.85), ("Spanish", 0.10), ("Other", 0.05)];

pub const ZIP_CODES: [&str; 165] = [
    "77001", "77002", "77003", "77004", "77005", "77006", "77007", "77008", "77009", "77010",
    "77011", "77012", "77013", "77014", "77015", "77016", "77017", "77018", "77019", "77020",
    "77021", "77022", "77023", "77024", "77025", "77026", "77027", "77028", "77029", "77030",
    "77031", "77032", "77033", "77034", "77035", "77036", "77037", "77038", "77039", "77040",
    "77041", "77042", "77043", "77044", "77045", "77046", "77047", "77048", "77049", "77050",
    "77051", "77052", "77053", "77054", "77055", "77056", "77057", "77058", "77059", "77060",
    "77061", "77062", "77063", "77064", "77065", "77066", "77067", "77068", "77069", "77070",
    "77071", "77072", "77073", "77074", "77075", "77076", "77077", "77078", "77079", "77080",
    "77081", "77082", "77083", "77084", "77085", "77086", "77087", "77088", "77089", "77090",
    "77091", "77092", "77093", "77094", "77095", "77096", "77097", "77098", "77099", "77338",
    "77339", "77345", "77346", "77347", "77354", "77357", "77365", "77373", "77375", "77377",
    "77379", "77380", "77381", "77382", "77383", "77384", "77385", "77386", "77388", "77389",
    "77391", "77393", "77396", "77401", "77402", "77406", "77407", "77429", "77433", "77447",
    "77449", "77450", "77459", "77469", "77477", "77478", "77479", "77484", "77489", "77493",
    "77494", "77498", "77502", "77503", "77504", "77505", "77506", "77507", "77508", "77520",
    "77521", "77530", "77532", "77536", "77539", "77546", "77547", "77562", "77571", "77573",
    "77581", "77584", "77586", "77587", "77598",
];

pub const MALE_FIRST_NAMES: [&str; 40] = [
    "James", "Michael", "David", "Daniel", "Matthew", "Anthony", "Joshua", "Andrew", "Jose",
    "Luis", "Carlos", "Juan", "Diego", "Mateo", "Santiago", "Liam", "Noah", "Elijah", "Ethan",
    "Aiden", "Jayden", "Isaiah", "Jeremiah", "Malik", "Xavier", "Caleb", "Gabriel", "Samuel",
    "Benjamin", "Lucas", "Henry", "Owen", "Wyatt", "Adrian", "Angel", "Nathan", "Ryan", "Kevin",
    "Tuan", "Arjun",
];

pub const FEMALE_FIRST_NAMES: [&str; 40] = [
    "Sofia", "Isabella", "Camila", "Valentina", "Mia", "Emma", "Olivia", "Ava", "Sophia",
    "Emily", "Abigail", "Madison", "Chloe", "Zoe", "Aaliyah", "Naomi", "Brianna", "Jasmine",
    "Maya", "Gabriela", "Lucia", "Ximena", "Natalia", "Victoria", "Harper", "Evelyn", "Amelia",
    "Layla", "Nevaeh", "Kennedy", "Destiny", "Grace", "Hannah", "Leah", "Priya", "Linh", "Mariana",
    "Daniela", "Ariana", "Elena",
];

pub const LAST_NAMES: [&str; 60] = [
    "Garcia", "Martinez", "Hernandez", "Lopez", "Gonzalez", "Rodriguez", "Perez", "Sanchez",
    "Ramirez", "Torres", "Flores", "Rivera", "Gomez", "Diaz", "Reyes", "Morales", "Cruz",
    "Ortiz", "Gutierrez", "Chavez", "Smith", "Johnson", "Williams", "Brown", "Jones", "Miller",
    "Davis", "Wilson", "Anderson", "Thomas", "Taylor", "Moore", "Jackson", "Martin", "Lee",
    "Thompson", "White", "Harris", "Clark", "Lewis", "Robinson", "Walker", "Young", "Allen",
    "King", "Wright", "Scott", "Green", "Baker", "Adams", "Nelson", "Hill", "Nguyen", "Tran",
    "Patel", "Kim", "Washington", "Okafor", "Shah", "Pham",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_weights_cover_zero_to_max() {
        let ages: Vec<u32> = AGE_WEIGHTS.iter().map(|(a, _)| *a).collect();
        assert_eq!(ages, (0..=MAX_AGE).collect::<Vec<_>>());
    }

    #[test]
    fn test_weight_tables_sum_to_one() {
        for table in [&RACES[..], &PEDIATRIC_INSURANCE[..], &YOUNG_ADULT_INSURANCE[..]] {
            let total: f64 = table.iter().map(|(_, w)| w).sum();
            assert!((total - 1.0).abs() < 1e-9);
        }
        let total: f64 = ETHNICITIES.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zip_codes_are_five_digits() {
        assert!(ZIP_CODES
            .iter()
            .all(|z| z.len() == 5 && z.chars().all(|c| c.is_ascii_digit())));
    }
}
