//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe) pour les expressions bien formées
//! - proptest pour les entrées arbitraires (nombre de cas fixe)
//! - profondeur bornée, budget temps global
//! - invariant clé : un échec ne modifie jamais Ans

use std::time::{Duration, Instant};

use proptest::prelude::*;

use super::erreur::ErreurCalc;
use super::format::format_reel;
use super::normalise::normalize;
use super::session::{AngleMode, Menu, ModeNumerique, Session};

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    let a = rng.pick(10);
    if rng.coin() {
        format!("{a}.{}", rng.pick(100))
    } else {
        format!("{a}")
    }
}

fn gen_atome(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 | 1 | 2 => gen_nombre(rng),
        3 => "pi".to_string(),
        4 => format!("sqrt{}", rng.pick(20)),
        _ => "ans".to_string(),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atome(rng);
    }

    let a = gen_expr(rng, depth - 1);
    match rng.pick(10) {
        0 => gen_atome(rng),
        1 => format!("({a}+{})", gen_expr(rng, depth - 1)),
        2 => format!("({a}-{})", gen_expr(rng, depth - 1)),
        3 => format!("({a}*{})", gen_expr(rng, depth - 1)),
        4 => format!("({a}/{})", gen_expr(rng, depth - 1)),
        5 => format!("({a})^{}", rng.pick(4)),
        6 => format!("sin({a})"),
        7 => format!("cos({a})"),
        8 => format!("log({a})"),
        _ => format!("-{a}"),
    }
}

/// Erreurs *normales* pour un fuzz bien formé : arithmétique ou domaine.
fn is_erreur_attendue(e: &ErreurCalc) -> bool {
    matches!(e, ErreurCalc::Evaluation(_))
}

/* ------------------------ Tests déterministes ------------------------ */

#[test]
fn fuzz_safe_determinisme_et_ans() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    let mut rng = Rng::new(0xC0FFEE_u64);
    let mut a = Session::new();
    let mut b = Session::new();

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..150 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);
        let avant = a.derniere_reponse();

        let ra = a.submit_expression(&expr);
        let rb = b.submit_expression(&expr);
        // même session, même entrée => même sortie
        assert_eq!(ra, rb, "expr={expr:?}");

        match ra {
            Ok(s) => {
                assert!(!s.is_empty(), "expr={expr:?}");
                assert!(a.derniere_reponse().is_some());
                seen_ok += 1;
            }
            Err(e) => {
                assert!(
                    is_erreur_attendue(&e),
                    "erreur non attendue: expr={expr:?} err={e}"
                );
                assert_eq!(a.derniere_reponse(), avant, "Ans modifiée sur échec");
                seen_err += 1;
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 10, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_menu_complexe_sans_erreur_de_domaine() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    let mut rng = Rng::new(0xBADC0DE_u64);
    let mut s = Session::new();
    s.set_menu(Menu::Complexe);

    for _ in 0..80 {
        budget(t0, max);

        // √ et log d’un négatif sont valides ici : seules division par zéro
        // et débordement restent possibles
        let expr = format!("sqrt(-{})+log(-{})", gen_nombre(&mut rng), rng.pick(9) + 1);
        if let Err(e) = s.submit_expression(&expr) {
            assert!(is_erreur_attendue(&e), "expr={expr:?} err={e}");
        }
    }
}

/* ------------------------ Propriétés (proptest) ------------------------ */

/// Morceaux d’expression, parenthèses comprises.
fn morceau() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "(", ")", "1", "23", "4.5", "+", "-", "*", "/", "^", "sin", "cos", "sqrt", "log", "pi",
    ])
}

/// Jamais plus de ')' que de '(' en lisant de gauche à droite.
fn sous_equilibree(morceaux: &[&str]) -> bool {
    let mut ouvertes: i64 = 0;
    for m in morceaux {
        match *m {
            "(" => ouvertes += 1,
            ")" => ouvertes -= 1,
            _ => {}
        }
        if ouvertes < 0 {
            return false;
        }
    }
    true
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Après normalisation : autant de '(' que de ')'.
    #[test]
    fn prop_parentheses_equilibrees(
        morceaux in prop::collection::vec(morceau(), 0..24),
        degres in any::<bool>(),
    ) {
        prop_assume!(sous_equilibree(&morceaux));

        let angle = if degres { AngleMode::Degres } else { AngleMode::Radians };
        // séparés par des espaces : "4.5" "4.5" ne doit pas devenir "4.54.5"
        let brut = morceaux.join(" ");
        let canon = normalize(&brut, angle, Menu::Calcul)
            .map_err(|e| TestCaseError::fail(format!("{brut:?}: {e}")))?;

        prop_assert_eq!(
            canon.matches('(').count(),
            canon.matches(')').count(),
            "brut={:?} canon={:?}", brut, canon
        );
    }

    /// Un entier s’affiche sans point décimal, quel que soit le mode.
    #[test]
    fn prop_entiers_affiches_tels_quels(n in -1_000_000_000_000i64..1_000_000_000_000i64) {
        let attendu = n.to_string();
        prop_assert_eq!(format_reel(n as f64, ModeNumerique::Exact), attendu.clone());
        prop_assert_eq!(format_reel(n as f64, ModeNumerique::Decimal), attendu);
    }

    /// Entrée arbitraire : jamais de panique, Ans intacte sur échec.
    #[test]
    fn prop_pas_de_panique(texte in "\\PC{0,40}", complexe in any::<bool>()) {
        let mut s = Session::new();
        if complexe {
            s.set_menu(Menu::Complexe);
        }
        s.submit_expression("3").map_err(|e| TestCaseError::fail(e.to_string()))?;
        let avant = s.derniere_reponse();

        if s.submit_expression(&texte).is_err() {
            prop_assert_eq!(s.derniere_reponse(), avant);
        }
    }

    /// Mode Décimal : ré-évaluer l’affichage redonne le même affichage.
    #[test]
    fn prop_idempotence_decimale(a in -1_000_000i64..1_000_000, b in 1i64..1000) {
        let mut s = Session::new();
        s.set_numeric_display_mode(ModeNumerique::Decimal);

        let premier = s.submit_expression(&format!("{a}/{b}"))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let second = s.submit_expression(&premier)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(premier, second);
    }
}
