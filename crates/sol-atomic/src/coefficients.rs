// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — AMJUEL Coefficients
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Fit coefficients for hydrogen rate coefficients.
//!
//! Bivariate tables are indexed `[density power][temperature power]` in
//! `ln(n * 1e-14)` and `ln(T)`, except charge exchange which is indexed
//! `[temperature power][energy power]`. Rates come out in cm^3/s.

/// AMJUEL H.4 2.1.8, radiative plus three-body recombination.
pub const RECOMBINATION: [[f64; 9]; 9] = [
    [
        -2.855728479302e1, -7.664042607917e-1, -4.930424003280e-3,
        -5.386830982777e-3, -1.626039237665e-4, 6.080907650243e-6,
        2.101102051942e-5, -2.770717597683e-6, 1.038235939800e-7,
    ],
    [
        3.488563234375e-2, -3.583233366133e-3, -3.620245352252e-3,
        -9.532840484460e-4, 1.888048628708e-4, -1.014890683861e-5,
        2.245676563601e-5, -4.695982369246e-6, 2.523166611507e-7,
    ],
    [
        -2.799644392058e-2, -7.452514292790e-3, 6.958711963182e-3,
        4.631753807534e-4, 1.288577690147e-4, -1.145028889459e-4,
        -2.245624273814e-6, 3.250878872873e-6, -2.145390398476e-7,
    ],
    [
        1.209545317879e-2, 2.709299760454e-3, -2.139257298118e-3,
        -5.371179699661e-4, -1.634580516353e-5, 5.942193980802e-5,
        -2.944873763540e-6, -9.387290785993e-7, 7.381435237585e-8,
    ],
    [
        -2.436630799820e-3, -7.745129766167e-4, 4.603883706734e-4,
        1.543350502150e-4, -9.601036952725e-6, -1.211851723717e-5,
        1.002105099354e-6, 1.392391630459e-7, -1.299713684966e-8,
    ],
    [
        2.837893719800e-4, 1.142444698207e-4, -5.991636837395e-5,
        -2.257565836876e-5, 3.425262385387e-6, 1.118965496365e-6,
        -1.291320799814e-7, -1.139093288575e-8, 1.265189576423e-9,
    ],
    [
        -1.886511169084e-5, -9.382783518064e-6, 4.729262545726e-6,
        1.730782954588e-6, -4.077019941998e-7, -4.275321573501e-8,
        7.786155463269e-9, 5.178505597480e-10, -6.854203970018e-11,
    ],
    [
        6.752155602894e-7, 3.902800099653e-7, -1.993485395689e-7,
        -6.618240780594e-8, 2.042041097083e-8, 3.708616111085e-10,
        -2.441127783437e-10, -9.452402157390e-12, 1.836615031798e-12,
    ],
    [
        -1.005893858779e-8, -6.387411585521e-9, 3.352589865190e-9,
        1.013364275013e-9, -3.707977721109e-10, 7.068450112690e-12,
        3.773208484020e-12, -4.672724022059e-14, -1.640492364811e-14,
    ],
];
/// AMJUEL H.4 2.1.5 (Sawada), effective ionisation.
pub const IONISATION: [[f64; 9]; 9] = [
    [
        -3.248025330340e1, 1.425332391510e1, -6.632235026785e0,
        2.059544135448e0, -4.425370331410e-1, 6.309381861496e-2,
        -5.620091829261e-3, 2.812016578355e-4, -6.011143453374e-6,
    ],
    [
        -5.440669186583e-2, -3.594347160760e-2, 9.255558353174e-2,
        -7.562462086943e-2, 2.882634019199e-2, -5.788686535780e-3,
        6.329105568040e-4, -3.564132950345e-5, 8.089651265488e-7,
    ],
    [
        9.048888225109e-2, -2.014729121556e-2, -5.580210154625e-3,
        1.519595967433e-2, -7.285771485050e-3, 1.507382955250e-3,
        -1.527777697951e-4, 7.222726811078e-6, -1.186212683668e-7,
    ],
    [
        -4.054078993576e-2, 1.039773615730e-2, -5.902218748238e-3,
        5.803498098354e-4, 4.643389885987e-4, -1.201550548662e-4,
        8.270124691336e-6, 1.433018694347e-7, -2.381080756307e-8,
    ],
    [
        8.976513750477e-3, -1.771792153042e-3, 1.295609806553e-3,
        -3.527285012725e-4, 1.145700685235e-6, 6.574487543511e-6,
        3.224101773605e-8, -1.097431215601e-7, 6.271173694534e-9,
    ],
    [
        -1.060334011186e-3, 1.237467264294e-4, -1.056721622588e-4,
        3.201533740322e-5, 8.493662724988e-7, -9.678782818849e-7,
        4.377402649057e-8, 7.789031791949e-9, -5.483010244930e-10,
    ],
    [
        6.846238436472e-5, -3.130184159149e-6, 4.646310029498e-6,
        -1.835196889733e-6, -1.001032516512e-8, 5.176265845225e-8,
        -2.622921686955e-9, -4.197728680251e-10, 3.064611702159e-11,
    ],
    [
        -2.242955329604e-6, -3.051994601527e-8, -1.479612391848e-7,
        9.474014343303e-8, -1.476839184318e-8, 1.291551676860e-9,
        -2.259663431436e-10, 3.032260338723e-11, -1.355903284487e-12,
    ],
    [
        2.890437688072e-8, 1.888148175469e-9, 2.852251258320e-9,
        -2.342505583774e-9, 6.047700368169e-10, -9.685157340473e-11,
        1.161438990709e-11, -8.911076930014e-13, 2.935080031599e-14,
    ],
];
/// AMJUEL H.10 2.1.5, electron energy loss weighted rate [eV cm^3/s].
/// Includes the 13.6 eV ionisation cost.
pub const EXCITATION_ENERGY: [[f64; 9]; 9] = [
    [
        -2.497580168306e1, 1.004448839974e1, -4.867952931298e0,
        1.689422238067e0, -4.103532320100e-1, 6.469718387357e-2,
        -6.215861314764e-3, 3.289809895460e-4, -7.335808238917e-6,
    ],
    [
        1.081653961822e-3, -3.189474633369e-3, -5.852267850690e-3,
        7.744372210287e-3, -3.622291213236e-3, 8.268567898126e-4,
        -9.836595524255e-5, 5.845697922558e-6, -1.367574486885e-7,
    ],
    [
        -7.358936044605e-4, 2.510128351932e-3, 2.867458651322e-3,
        -3.087364236497e-3, 1.327415215304e-3, -2.830939623802e-4,
        3.017296919092e-5, -1.479323780613e-6, 2.423236476442e-8,
    ],
    [
        4.122398646951e-4, -7.707040988954e-4, -8.328668093987e-4,
        4.707676288420e-4, -1.424078519508e-4, 2.411848024960e-5,
        -1.474253805845e-6, -4.633029022577e-8, 5.733871119707e-9,
    ],
    [
        -1.408153300988e-4, 1.031309578578e-4, 2.056134355492e-4,
        -5.508611815406e-5, 3.307339563081e-6, 5.707984861100e-7,
        -2.397868837417e-7, 3.337390374041e-8, -1.512777532459e-9,
    ],
    [
        2.469730836220e-5, -3.716939423005e-6, -3.301570807523e-5,
        7.305867762241e-6, 5.256679519499e-9, -1.016945693300e-7,
        1.518743025531e-8, -1.770252084837e-9, 8.733801272834e-11,
    ],
    [
        -2.212823709798e-6, -4.249704742353e-7, 2.831739755462e-6,
        -6.000115718138e-7, 7.597020291557e-10, 3.517154874443e-9,
        4.149084521319e-10, -5.289806153651e-11, 7.196798841269e-13,
    ],
    [
        9.648139704737e-8, 4.164960852522e-8, -1.164969298033e-7,
        2.045211951761e-8, 1.799505288362e-9, -4.453195673947e-10,
        -6.803200444549e-12, 3.864394776250e-12, -1.441033650378e-13,
    ],
    [
        -1.611904413846e-9, -9.893423877739e-10, 1.785440278790e-9,
        -1.790312871690e-10, -9.280890205774e-11, 2.002478264932e-11,
        -1.151855939531e-12, -8.694978774411e-15, 1.734769090475e-15,
    ],
];
/// AMJUEL H.3 3.1.8, resonant charge exchange vs (T, neutral energy).
pub const CHARGE_EXCHANGE: [[f64; 9]; 9] = [
    [
        -1.829079582e1, 1.640252721e-1, 3.364564509e-2,
        9.530225559e-3, -8.519413900e-4, -1.247583861e-3,
        3.014307546e-4, -2.499323170e-5, 6.932627238e-7,
    ],
    [
        2.169137616e-1, -1.106722014e-1, -1.382158680e-3,
        7.348786287e-3, -6.343059502e-4, -1.919569450e-4,
        4.075019352e-5, -2.850044983e-6, 6.966822400e-8,
    ],
    [
        4.307131244e-2, 8.948693625e-3, -1.209480567e-2,
        -3.675019470e-4, 1.039643391e-3, -1.553840718e-4,
        2.670827249e-6, 7.695300598e-7, -3.783302282e-8,
    ],
    [
        -5.754895093e-4, 6.062141761e-3, 1.075907882e-3,
        -8.119301728e-4, 8.911036876e-6, 3.175388950e-5,
        -4.515123642e-6, 2.187439284e-7, -2.911233952e-9,
    ],
    [
        -1.552077120e-3, -1.210431588e-3, 8.297212634e-4,
        1.361661817e-4, -1.008928628e-4, 1.080693990e-5,
        5.106059414e-7, -1.299275586e-7, 5.117133050e-9,
    ],
    [
        -1.876800283e-4, -4.052878752e-5, -1.907025663e-4,
        1.141663042e-5, 1.775681984e-5, -3.149286924e-6,
        3.105491555e-8, 2.274394089e-8, -1.130988251e-9,
    ],
    [
        1.125490271e-4, 2.875900436e-5, 1.338839629e-5,
        -4.340802793e-6, -7.003521917e-7, 2.318308730e-7,
        -6.030983538e-9, -1.755944926e-9, 1.005189187e-10,
    ],
    [
        -1.238982763e-5, -2.616998140e-6, -1.171762874e-7,
        3.517971869e-7, -4.928692833e-8, 1.756388999e-10,
        -1.446756796e-10, 7.143183138e-11, -3.989884106e-12,
    ],
    [
        4.163596197e-7, 7.558092849e-8, -1.328404104e-8,
        -9.170850254e-9, 3.208853884e-9, -3.952740759e-10,
        2.739558476e-11, -1.693040209e-12, 6.388219930e-14,
    ],
];
/// Temperature-only ionisation fit in powers of ln(T).
pub const IONISATION_1D: [f64; 9] = [
    -3.271397e1,
    1.353656e1,
    -5.739329,
    1.563155,
    -2.877056e-1,
    3.48256e-2,
    -2.631976e-3,
    1.119544e-4,
    -2.03915e-6,
];
