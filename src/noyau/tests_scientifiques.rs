//! Tests scientifiques (campagne) : propriétés de bout en bout, via `Session`
//! et les fonctions publiques du noyau.
//!
//! But : vérifier les contrats visibles sans dépendre des détails internes.
//! - budget temps global sur les stress
//! - tailles bornées (profondeur, longueur)
//!
//! Notes :
//! - Les valeurs trig passent par des flottants : on compare à tolérance près,
//!   puis on vérifie l’affichage EXACT quand la forme est reconnue (1/2, √2/2…).
//! - Le solveur ne passe jamais par la normalisation : ses tests sont séparés.

use std::time::{Duration, Instant};

use num_complex::Complex64;

use super::equations::{solve_linear_system, solve_polynomial};
use super::erreur::ErreurCalc;
use super::eval::{evaluate, Domaine};
use super::format::format;
use super::normalise::normalize;
use super::polaire::resolve_polar;
use super::session::{AngleMode, Menu, ModeComplexe, ModeNumerique, Session};

fn session(angle: AngleMode, numerique: ModeNumerique) -> Session {
    let mut s = Session::new();
    s.set_angle_mode(angle);
    s.set_numeric_display_mode(numerique);
    s
}

fn submit_ok(s: &mut Session, expr: &str) -> String {
    s.submit_expression(expr)
        .unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

fn valeur(expr: &str, angle: AngleMode) -> f64 {
    let canon = normalize(expr, angle, Menu::Calcul)
        .unwrap_or_else(|e| panic!("normalize({expr:?}) err={e}"));
    evaluate(&canon, Domaine::Reel, None)
        .unwrap_or_else(|e| panic!("evaluate({canon:?}) err={e}"))
        .re
}

fn proche(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Chaîne complète ------------------------ */

#[test]
fn sci_aller_retour_entier() {
    let canon = normalize("2+3*4", AngleMode::Degres, Menu::Calcul).unwrap();
    let v = evaluate(&canon, Domaine::Reel, None).unwrap();
    let s = format(v, Menu::Calcul, ModeComplexe::Rectangulaire, ModeNumerique::Exact);
    assert_eq!(s, "14");
}

#[test]
fn sci_entiers_sans_point_decimal() {
    for mode in [ModeNumerique::Exact, ModeNumerique::Decimal] {
        let mut s = session(AngleMode::Degres, mode);
        assert_eq!(submit_ok(&mut s, "6/3"), "2");
        assert_eq!(submit_ok(&mut s, "-2^2"), "-4");
        assert_eq!(submit_ok(&mut s, "0*-5"), "0");
        assert_eq!(submit_ok(&mut s, "sqrt16"), "4");
        assert_eq!(submit_ok(&mut s, "log1000"), "3");
    }
}

/* ------------------------ Mode d’angle ------------------------ */

#[test]
fn sci_sensibilite_mode_angle() {
    assert!(proche(valeur("sin30", AngleMode::Degres), 0.5));
    assert!(proche(valeur("sin(pi/6)", AngleMode::Radians), 0.5));
    assert!(proche(valeur("cos(60)", AngleMode::Degres), 0.5));
    assert!(proche(valeur("tan45", AngleMode::Degres), 1.0));
}

#[test]
fn sci_angles_remarquables_exacts() {
    let mut s = session(AngleMode::Degres, ModeNumerique::Exact);
    assert_eq!(submit_ok(&mut s, "sin30"), "1/2");
    assert_eq!(submit_ok(&mut s, "sin45"), "√2/2");
    assert_eq!(submit_ok(&mut s, "cos30"), "√3/2");
    assert_eq!(submit_ok(&mut s, "tan30"), "√3/3");
    assert_eq!(submit_ok(&mut s, "1/sqrt(3)"), "√3/3");
}

#[test]
fn sci_forme_exacte_relue() {
    // ce que l’affichage EXACT montre doit pouvoir être ressaisi tel quel
    let mut s = session(AngleMode::Degres, ModeNumerique::Exact);
    for expr in ["2/sqrt(3)", "sqrt(12)", "-sqrt(50)/3", "sqrt(2)/2"] {
        let premier = submit_ok(&mut s, expr);
        let second = submit_ok(&mut s, &premier);
        assert_eq!(premier, second, "expr={expr:?}");
    }
    assert_eq!(submit_ok(&mut s, "2√3/3"), "2√3/3");
}

#[test]
fn sci_symetries_trig() {
    // sin(-x) = -sin(x), cos(-x) = cos(x)
    let mut s = session(AngleMode::Degres, ModeNumerique::Exact);
    assert_eq!(submit_ok(&mut s, "sin(-45)"), "-√2/2");
    assert_eq!(submit_ok(&mut s, "cos(-60)"), "1/2");
    // périodicité (flottants : forme exacte retrouvée)
    assert_eq!(submit_ok(&mut s, "sin(45+360)"), "√2/2");
}

/* ------------------------ Parenthèses ------------------------ */

#[test]
fn sci_equilibre_apres_normalisation() {
    for expr in ["(1+2", "((3", "sin(30", "cos(sin(10", "(1+2)*(3", "2*(3+(4"] {
        for angle in AngleMode::TOUS {
            let canon = normalize(expr, angle, Menu::Calcul).unwrap();
            let ouvrantes = canon.matches('(').count();
            let fermantes = canon.matches(')').count();
            assert_eq!(ouvrantes, fermantes, "expr={expr:?} canon={canon:?}");
        }
    }
}

#[test]
fn sci_trop_de_fermantes_refuse() {
    let mut s = Session::new();
    let r = s.submit_expression("2)+1");
    assert!(matches!(r, Err(ErreurCalc::Syntaxe(_))), "{r:?}");
}

/* ------------------------ Complexes ------------------------ */

#[test]
fn sci_litteral_polaire() {
    let z = resolve_polar("10∠90", AngleMode::Degres).unwrap();
    assert!(z.re.abs() < 1e-9 && (z.im - 10.0).abs() < 1e-9, "{z}");
}

#[test]
fn sci_affichage_polaire_et_rectangulaire() {
    let mut s = Session::new();
    s.set_menu(Menu::Complexe);
    assert_eq!(submit_ok(&mut s, "2∠180"), "-2+0i");
    s.set_complex_display_mode(ModeComplexe::Polaire);
    assert_eq!(submit_ok(&mut s, "i"), "1 ∠ 90");
    assert_eq!(submit_ok(&mut s, "ans*2"), "2 ∠ 90");
}

#[test]
fn sci_i_hors_menu_complexe() {
    let mut s = Session::new();
    assert!(matches!(s.submit_expression("2i"), Err(ErreurCalc::Evaluation(_))));
    assert!(matches!(s.submit_expression("sqrt(-1)"), Err(ErreurCalc::Evaluation(_))));
    s.set_menu(Menu::Complexe);
    assert_eq!(submit_ok(&mut s, "sqrt(-1)"), "0+1i");
}

/* ------------------------ Solveur ------------------------ */

#[test]
fn sci_polynome_second_degre() {
    let r = solve_polynomial(&[1.0, -3.0, 2.0]).unwrap();
    assert_eq!(r, vec![Complex64::new(1.0, 0.0), Complex64::new(2.0, 0.0)]);
}

#[test]
fn sci_polynome_racines_complexes() {
    // x² + 1 : pas de racine réelle
    let r = solve_polynomial(&[1.0, 0.0, 1.0]).unwrap();
    assert_eq!(r, vec![Complex64::new(0.0, -1.0), Complex64::new(0.0, 1.0)]);
}

#[test]
fn sci_racines_verifient_le_polynome() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    let cas: [&[f64]; 4] = [
        &[2.0, -3.0, 0.5, 7.0],
        &[1.0, 0.0, -7.0, 6.0],
        &[3.0, 1.0, -4.0, 2.0, -9.0],
        &[1.0, 0.0, 0.0, 0.0, 16.0],
    ];
    for coeffs in cas {
        let racines = solve_polynomial(coeffs).unwrap();
        assert_eq!(racines.len(), coeffs.len() - 1);
        for z in &racines {
            let p = coeffs
                .iter()
                .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * z + c);
            assert!(p.norm() < 1e-9, "coeffs={coeffs:?} z={z} p(z)={p}");
        }
        budget(t0, max);
    }
}

#[test]
fn sci_racines_multiples_affichees_reelles() {
    let s = Session::new();
    assert_eq!(
        s.submit_polynomial(&["1", "-6", "12", "-8"]).unwrap(),
        "x1 = 2, x2 = 2, x3 = 2"
    );
    assert_eq!(
        s.submit_polynomial(&["1", "-4", "6", "-4", "1"]).unwrap(),
        "x1 = 1, x2 = 1, x3 = 1, x4 = 1"
    );
}

#[test]
fn sci_systeme_lineaire() {
    let x = solve_linear_system(&[vec![1.0, 1.0], vec![1.0, -1.0]], &[4.0, 0.0]).unwrap();
    assert_eq!(x, vec![2.0, 2.0]);
}

#[test]
fn sci_systeme_singulier_ne_touche_pas_ans() {
    let mut s = Session::new();
    submit_ok(&mut s, "42");
    let r = s.submit_linear_system(&[vec!["1", "1"], vec!["1", "1"]], &["2", "3"]);
    assert_eq!(r, Err(ErreurCalc::MatriceSinguliere));
    assert_eq!(Session::afficher(&r), "Error");
    assert_eq!(s.derniere_reponse(), Some(Complex64::new(42.0, 0.0)));
}

/* ------------------------ Idempotence décimale ------------------------ */

#[test]
fn sci_idempotence_decimale() {
    let mut s = session(AngleMode::Degres, ModeNumerique::Decimal);
    for expr in ["1/3", "sqrt(2)", "sin(10)", "2^0.5*3", "-7/9", "1e-7/3", "123456.789/1000"] {
        let premier = submit_ok(&mut s, expr);
        let second = submit_ok(&mut s, &premier);
        assert_eq!(premier, second, "expr={expr:?}");
    }
}

/* ------------------------ Stress contrôlé ------------------------ */

#[test]
fn sci_stress_somme_longue() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    let mut expr = String::new();
    for k in 0..200 {
        if k > 0 {
            expr.push_str(" + ");
        }
        expr.push_str("1/2");
        budget(t0, max);
    }

    let mut s = Session::new();
    assert_eq!(submit_ok(&mut s, &expr), "100");
}

#[test]
fn sci_stress_moins_en_cascade() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let mut s = Session::new();
    submit_ok(&mut s, "5");
    for expr in [
        format!("{}1", "-".repeat(200_000)),
        format!("2{}", "^1".repeat(50_000)),
        format!("{}1", "sqrt(".repeat(5_000)),
    ] {
        let r = s.submit_expression(&expr);
        assert!(matches!(r, Err(ErreurCalc::Syntaxe(_))), "len={}", expr.len());
        assert_eq!(Session::afficher(&r), "Error");
        budget(t0, max);
    }
    assert_eq!(s.derniere_reponse(), Some(Complex64::new(5.0, 0.0)));
}

#[test]
fn sci_stress_profondeur_parentheses() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    // 60 niveaux jamais fermés : l’auto-fermeture s’en charge
    let expr = format!("{}1+1", "(".repeat(60));
    budget(t0, max);

    let mut s = Session::new();
    assert_eq!(submit_ok(&mut s, &expr), "2");
}
