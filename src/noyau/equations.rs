// src/noyau/equations.rs
//
// Solveur d’équations, indépendant de la normalisation / évaluation :
// - racines d’un polynôme réel (coefficients du plus haut degré au terme constant)
// - système linéaire carré A·x = b
//
// Degré 1 et 2 : formules directes. Degrés 3 et 4 : Durand–Kerner (toutes les
// racines en même temps), puis quelques pas de Newton sur le polynôme d’origine.

use std::cmp::Ordering;

use num_complex::Complex64;
use tracing::debug;

use super::erreur::{ErreurCalc, Resultat};

/// Nombre de coefficients accepté (degré 2 à 4).
pub const COEFFICIENTS_MIN: usize = 3;
pub const COEFFICIENTS_MAX: usize = 5;

/// Taille accepté d’un système (2×2 à 4×4).
pub const SYSTEME_MIN: usize = 2;
pub const SYSTEME_MAX: usize = 4;

/// Pivot négligeable devant le plus grand coefficient -> matrice singulière.
pub const SEUIL_SINGULIER: f64 = 1e-12;

const ITERATIONS_DK: usize = 1000;
const ITERATIONS_NEWTON: usize = 20;

/// Partie imaginaire (ou écart à un entier) considérée comme du bruit numérique.
/// Une racine double n’est obtenue qu’à ~√ε près par Durand–Kerner.
const BRUIT_RACINE: f64 = 1e-7;

/// Écart relatif en dessous duquel deux racines approchées sont candidates
/// à une racine multiple (≈ ε^(1/4) pour une racine quadruple).
const RAYON_GROUPE: f64 = 1e-3;

/* ------------------------ Polynômes ------------------------ */

/// p(z) par Horner (coefficients réels, plus haut degré en tête).
fn horner(coeffs: &[f64], z: Complex64) -> Complex64 {
    coeffs
        .iter()
        .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * z + c)
}

fn derivee(coeffs: &[f64]) -> Vec<f64> {
    let n = coeffs.len().saturating_sub(1);
    coeffs[..n]
        .iter()
        .enumerate()
        .map(|(i, &c)| c * (n - i) as f64)
        .collect()
}

/// Échelle de |p(x)| autour de x, pour juger qu’une valeur est “nulle”.
fn echelle(coeffs: &[f64], x: f64) -> f64 {
    let n = coeffs.len().saturating_sub(1) as i32;
    let norme: f64 = coeffs.iter().map(|c| c.abs()).sum();
    norme * x.abs().max(1.0).powi(n)
}

/// Racines de `coeffs` (3 à 5 coefficients finis, degré décroissant).
/// Les zéros de tête sont retirés : le polynôme perd un degré.
/// Un polynôme constant non nul n’a pas de racine (liste vide).
pub fn solve_polynomial(coeffs: &[f64]) -> Resultat<Vec<Complex64>> {
    if !(COEFFICIENTS_MIN..=COEFFICIENTS_MAX).contains(&coeffs.len()) {
        return Err(ErreurCalc::saisie(format!(
            "{} coefficients (attendu {COEFFICIENTS_MIN} à {COEFFICIENTS_MAX})",
            coeffs.len()
        )));
    }
    if coeffs.iter().any(|c| !c.is_finite()) {
        return Err(ErreurCalc::saisie("coefficient non fini"));
    }

    let debut = coeffs.iter().position(|&c| c != 0.0);
    let Some(debut) = debut else {
        return Err(ErreurCalc::saisie("polynôme nul"));
    };
    let p = &coeffs[debut..];

    let mut racines = match p.len() - 1 {
        0 => Vec::new(),
        1 => vec![Complex64::new(-p[1] / p[0], 0.0)],
        2 => quadratique(p[0], p[1], p[2]),
        _ => {
            let approchees: Vec<Complex64> =
                durand_kerner(p).into_iter().map(|z| polir(p, z)).collect();
            regrouper(p, approchees)
        }
    };

    for z in racines.iter_mut() {
        *z = nettoyer_racine(p, *z);
    }
    racines.sort_by(ordre_racines);

    debug!(?coeffs, ?racines, "polynôme résolu");
    Ok(racines)
}

/// ax² + bx + c, forme stable (pas de soustraction de quantités voisines).
fn quadratique(a: f64, b: f64, c: f64) -> Vec<Complex64> {
    let delta = b * b - 4.0 * a * c;
    if delta < 0.0 {
        let re = -b / (2.0 * a);
        let im = (-delta).sqrt() / (2.0 * a);
        return vec![Complex64::new(re, -im.abs()), Complex64::new(re, im.abs())];
    }

    let q = -0.5 * (b + b.signum() * delta.sqrt());
    if q == 0.0 {
        // b = 0 et c = 0
        return vec![Complex64::new(0.0, 0.0); 2];
    }
    vec![Complex64::new(q / a, 0.0), Complex64::new(c / q, 0.0)]
}

/// Itération de Durand–Kerner (Weierstrass) sur le polynôme rendu unitaire.
fn durand_kerner(coeffs: &[f64]) -> Vec<Complex64> {
    let n = coeffs.len() - 1;
    let unitaire: Vec<f64> = coeffs.iter().map(|c| c / coeffs[0]).collect();

    let germe = Complex64::new(0.4, 0.9);
    let mut z: Vec<Complex64> = (0..n).map(|k| germe.powu(k as u32)).collect();

    for _ in 0..ITERATIONS_DK {
        let mut pas_max: f64 = 0.0;
        for i in 0..n {
            let mut produit = Complex64::new(1.0, 0.0);
            for (j, zj) in z.iter().enumerate() {
                if j != i {
                    produit *= z[i] - zj;
                }
            }
            if produit.norm() == 0.0 {
                continue;
            }
            let pas = horner(&unitaire, z[i]) / produit;
            z[i] -= pas;
            pas_max = pas_max.max(pas.norm() / z[i].norm().max(1.0));
        }
        if pas_max < 1e-15 {
            break;
        }
    }
    z
}

/// Newton sur le polynôme d’origine ; un pas n’est gardé que s’il réduit |p|.
fn polir(coeffs: &[f64], mut z: Complex64) -> Complex64 {
    let d = derivee(coeffs);
    let mut residu = horner(coeffs, z).norm();
    for _ in 0..ITERATIONS_NEWTON {
        if residu == 0.0 {
            break;
        }
        let pente = horner(&d, z);
        if pente.norm() == 0.0 {
            break;
        }
        let candidat = z - horner(coeffs, z) / pente;
        let r = horner(coeffs, candidat).norm();
        if !(r < residu) {
            break;
        }
        z = candidat;
        residu = r;
    }
    z
}

/// Une racine de multiplicité m sort de Durand–Kerner éclatée en m points,
/// à ~ε^(1/m) près. Le groupe est remplacé par la racine simple de p^(m-1)
/// la plus proche de son barycentre, si p et ses m-1 premières dérivées s’y
/// annulent au bruit près.
fn regrouper(coeffs: &[f64], racines: Vec<Complex64>) -> Vec<Complex64> {
    let n = racines.len();
    let mut sortie = racines.clone();
    let mut pris = vec![false; n];

    for i in 0..n {
        if pris[i] {
            continue;
        }
        let rayon = RAYON_GROUPE * racines[i].norm().max(1.0);
        let groupe: Vec<usize> = (i..n)
            .filter(|&j| !pris[j] && (racines[j] - racines[i]).norm() <= rayon)
            .collect();
        if groupe.len() < 2 {
            continue;
        }

        let barycentre =
            groupe.iter().map(|&j| racines[j]).sum::<Complex64>() / groupe.len() as f64;
        // p, p', …, p^(m-1)
        let mut derivees = vec![coeffs.to_vec()];
        for k in 1..groupe.len() {
            derivees.push(derivee(&derivees[k - 1]));
        }
        let centre = match derivees.last() {
            Some(d) => polir(d, barycentre),
            None => barycentre,
        };

        // racine de multiplicité m : p^(k)(centre) ≈ 0 pour k < m
        let multiple = derivees.iter().all(|d| {
            horner(d, centre).norm() <= 64.0 * f64::EPSILON * echelle(d, centre.norm())
        });
        if multiple {
            debug!(?centre, multiplicite = groupe.len(), "racine multiple");
            for &j in &groupe {
                pris[j] = true;
                sortie[j] = centre;
            }
        }
    }
    sortie
}

/// Partie imaginaire parasite -> racine réelle ; presque entier et racine -> entier.
fn nettoyer_racine(coeffs: &[f64], mut z: Complex64) -> Complex64 {
    let taille = z.norm().max(1.0);

    if z.im != 0.0 && z.im.abs() <= BRUIT_RACINE * taille {
        let re = Complex64::new(z.re, 0.0);
        if horner(coeffs, re).norm() <= BRUIT_RACINE * echelle(coeffs, z.re) {
            z = re;
        }
    }
    if z.im != 0.0 && z.re.abs() <= 1e-12 * taille {
        z.re = 0.0;
    }

    if z.im == 0.0 {
        let k = z.re.round();
        if (z.re - k).abs() <= BRUIT_RACINE * k.abs().max(1.0)
            && horner(coeffs, Complex64::new(k, 0.0)).norm() <= 1e-12 * echelle(coeffs, k)
        {
            z.re = k;
        }
        // pas de -0
        z.re += 0.0;
    }
    z
}

/// Réelles d’abord (croissantes), puis complexes (partie réelle, puis imaginaire).
fn ordre_racines(a: &Complex64, b: &Complex64) -> Ordering {
    let reelle_a = a.im == 0.0;
    let reelle_b = b.im == 0.0;
    match (reelle_a, reelle_b) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.re.total_cmp(&b.re).then(a.im.total_cmp(&b.im)),
    }
}

/* ------------------------ Systèmes linéaires ------------------------ */

struct Lu {
    matrice: Vec<Vec<f64>>,
    permutation: Vec<usize>,
}

/// A·x = b, A carrée de taille 2 à 4.
pub fn solve_linear_system(a: &[Vec<f64>], b: &[f64]) -> Resultat<Vec<f64>> {
    let n = a.len();
    if !(SYSTEME_MIN..=SYSTEME_MAX).contains(&n) {
        return Err(ErreurCalc::saisie(format!(
            "système {n}×{n} (attendu {SYSTEME_MIN} à {SYSTEME_MAX} inconnues)"
        )));
    }
    if a.iter().any(|ligne| ligne.len() != n) || b.len() != n {
        return Err(ErreurCalc::saisie("dimensions incohérentes"));
    }
    if a.iter().flatten().chain(b).any(|v| !v.is_finite()) {
        return Err(ErreurCalc::saisie("coefficient non fini"));
    }

    let lu = decomposer(a)?;
    let x = resoudre_lu(&lu, b);
    debug!(?x, "système résolu");
    Ok(x)
}

/// Décomposition LU avec pivot partiel (L unitaire stockée sous la diagonale).
fn decomposer(a: &[Vec<f64>]) -> Resultat<Lu> {
    let n = a.len();
    let mut lu = a.to_vec();
    let mut permutation: Vec<usize> = (0..n).collect();

    let plus_grand = a
        .iter()
        .flatten()
        .fold(0.0_f64, |m, v| m.max(v.abs()));
    let seuil = SEUIL_SINGULIER * plus_grand;

    for k in 0..n {
        // pivot
        let mut max_val = lu[k][k].abs();
        let mut max_idx = k;
        for i in (k + 1)..n {
            if lu[i][k].abs() > max_val {
                max_val = lu[i][k].abs();
                max_idx = i;
            }
        }

        if max_val == 0.0 || max_val < seuil {
            return Err(ErreurCalc::MatriceSinguliere);
        }

        if max_idx != k {
            lu.swap(k, max_idx);
            permutation.swap(k, max_idx);
        }

        // élimination
        for i in (k + 1)..n {
            lu[i][k] /= lu[k][k];
            for j in (k + 1)..n {
                lu[i][j] -= lu[i][k] * lu[k][j];
            }
        }
    }

    Ok(Lu {
        matrice: lu,
        permutation,
    })
}

fn resoudre_lu(lu: &Lu, b: &[f64]) -> Vec<f64> {
    let n = b.len();
    let mut x: Vec<f64> = lu.permutation.iter().map(|&i| b[i]).collect();

    // descente (L)
    for i in 0..n {
        for j in 0..i {
            x[i] -= lu.matrice[i][j] * x[j];
        }
    }

    // remontée (U), pivots déjà vérifiés
    for i in (0..n).rev() {
        for j in (i + 1)..n {
            x[i] -= lu.matrice[i][j] * x[j];
        }
        x[i] /= lu.matrice[i][i];
        x[i] += 0.0;
    }
    x
}
