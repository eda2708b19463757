//! Справка «Знай свои права»: шесть основных прав по Конституции Индии.
//!
//! Данные статичны и не требуют ни сети, ни сессии.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Одно основное право.
pub struct Right {
    /// Название.
    pub title: &'static str,
    /// Краткое описание.
    pub description: &'static str,
}

/// Основные права в порядке показа.
pub const FUNDAMENTAL_RIGHTS: [Right; 6] = [
    Right {
        title: "Right to Equality",
        description: "Ensures equal treatment before law, prohibits discrimination on grounds of religion, race, caste, sex or place of birth.",
    },
    Right {
        title: "Right to Freedom",
        description: "Grants freedom of speech, expression, assembly, association, movement, residence, and profession.",
    },
    Right {
        title: "Right against Exploitation",
        description: "Prohibits forced labor, child labor, and human trafficking in any form.",
    },
    Right {
        title: "Right to Freedom of Religion",
        description: "Guarantees religious freedom and allows all individuals to practice, propagate and manage their religion.",
    },
    Right {
        title: "Cultural and Educational Rights",
        description: "Protects the rights of cultural, religious, and linguistic minorities to preserve their heritage and establish institutions.",
    },
    Right {
        title: "Right to Constitutional Remedies",
        description: "Allows individuals to approach the Supreme Court or High Courts to enforce fundamental rights through writs.",
    },
];

/// Право с номером `index`; за последним снова идёт первое.
pub fn right_at(index: usize) -> &'static Right {
    &FUNDAMENTAL_RIGHTS[index % FUNDAMENTAL_RIGHTS.len()]
}
