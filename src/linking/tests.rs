use super::*;
use crate::constants::DEFAULT_LINK_THRESHOLD;

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

fn as_tuple(span: &Span) -> (usize, usize, &str) {
    (span.start, span.end, span.text.as_str())
}

#[test]
fn test_indel_ratio() {
    assert_eq!(indel_ratio(&chars(""), &chars("")), 100.0);
    assert_eq!(indel_ratio(&chars("abc"), &chars("abc")), 100.0);
    assert_eq!(indel_ratio(&chars("abc"), &chars("xyz")), 0.0);
    // lcs "ac": 100 * 2 * 2 / 5
    assert!((indel_ratio(&chars("abc"), &chars("ac")) - 80.0).abs() < 1e-9);
}

#[test]
fn test_partial_ratio_alignment_substring() {
    let alignment = partial_ratio_alignment("fox", "the quick fox jumps").unwrap();
    assert_eq!(alignment.score, 100.0);
    assert_eq!((alignment.src_start, alignment.src_end), (0, 3));
    assert_eq!((alignment.dest_start, alignment.dest_end), (10, 13));
}

#[test]
fn test_partial_ratio_alignment_longer_first_argument() {
    let alignment = partial_ratio_alignment("the quick fox jumps", "fox").unwrap();
    assert_eq!(alignment.score, 100.0);
    assert_eq!((alignment.src_start, alignment.src_end), (10, 13));
    assert_eq!((alignment.dest_start, alignment.dest_end), (0, 3));
}

#[test]
fn test_partial_ratio_alignment_empty() {
    assert!(partial_ratio_alignment("", "abc").is_none());
    assert_eq!(partial_ratio_alignment("", "").unwrap().score, 100.0);
}

#[test]
fn test_partial_ratio_uses_char_indices() {
    let alignment = partial_ratio_alignment("sœur", "la grande sœur de pape").unwrap();
    assert_eq!(alignment.score, 100.0);
    assert_eq!((alignment.dest_start, alignment.dest_end), (10, 14));
}

#[test]
fn test_find_quote_in_sentence() {
    let cases: &[(&str, &str, &str, Option<(usize, usize, &str)>)] = &[
        (
            "perfect match",
            "claim in sentence",
            "claim in sentence",
            Some((0, 17, "claim in sentence")),
        ),
        (
            "claim in sentence",
            "the claim in sentence nicely",
            "claim in sentence",
            Some((4, 21, "claim in sentence")),
        ),
        (
            "sentence in claim",
            "claim in sentence",
            "the claim in sentence nicely",
            Some((0, 17, "claim in sentence")),
        ),
        (
            "almost perfect match",
            "Mr Blobby was in his usual fine form tonight on top of the pops.",
            "Mr Blobby was in his usual fine form tonight on topofthepops",
            Some((0, 60, "Mr Blobby was in his usual fine form tonight on top of the p")),
        ),
        (
            "no match",
            "this text does not match the other",
            "no relation at all",
            None,
        ),
        (
            "punctuation change",
            "Mr Johnson said, 'I really am a VERY CLEVER boy indeed!'.",
            "\"I really am a very clever boy indeed\"",
            Some((18, 56, "I really am a VERY CLEVER boy indeed!'")),
        ),
        (
            "typo",
            "A sentence with a tpyo in it.",
            "A sentence with a typo in it.",
            Some((0, 29, "A sentence with a tpyo in it.")),
        ),
        (
            "Arabic no match",
            "والثلاثاء, تم توقيف رجل يشتبه بارتكابه الجريمة في سويسرا, بحسب مسؤولين فرنسيين.",
            "وأفاد مكتب المدعي العام في باريس الثلاثاء بأنه تم التعرّف على هوية المشتبه به \"وتوقيفه اليوم في كانتون جنيف\".",
            None,
        ),
        (
            "Arabic good match",
            "واستمع المعايطة إلى ملاحظات رؤساء اللجان وأهم التحديات التي واجهتهم في جميع مراحل العملية الانتخابية, كما وسيتم تقديم توصيات مكتوبة من قبل لجان الانتخاب, لتتم مناقشتها ودراستها من خلال عدة جلسات, للاستفادة منها في تجويد العملية الانتخابية مستقبلا.",
            "وستتم تقديم توصيات مكتوبة من قبل لجان الانتخاب, لتتم مناقشتها ودراستها من خلال عدة جلسات, للاستفادة منها في تجويد العملية الانتخابية مستقبلا.",
            Some((106, 247, "وسيتم تقديم توصيات مكتوبة من قبل لجان الانتخاب, لتتم مناقشتها ودراستها من خلال عدة جلسات, للاستفادة منها في تجويد العملية الانتخابية مستقبلا.")),
        ),
        (
            "French good match",
            "Cependant, n'ayant pas assez d'espace dans sa demeure pour contenir plus de 50 candidats, Lamine Gaye se charge de les transporter au domicile de Fatou Sall qui se trouve être la grande sœur de Pape Sow, l'un des plus proches collaborateurs du lutteur.",
            "Fatou Sall qui se trouve être la grande sœur de Pape Sow, l'un des plus proches collaborateurs du lutteur.",
            Some((146, 252, "Fatou Sall qui se trouve être la grande sœur de Pape Sow, l'un des plus proches collaborateurs du lutteur.")),
        ),
    ];
    for &(name, sentence, quote, expected) in cases {
        let span = find_quote_in_sentence(sentence, quote, DEFAULT_LINK_THRESHOLD);
        assert_eq!(span.as_ref().map(as_tuple), expected, "case: {name}");
    }
}

#[test]
fn test_find_quote_respects_threshold() {
    let sentence = "A sentence with a tpyo in it.";
    let quote = "A sentence with a typo in it.";
    assert!(find_quote_in_sentence(sentence, quote, 80.0).is_some());
    assert!(find_quote_in_sentence(sentence, quote, 99.0).is_none());
    assert!(find_quote_in_sentence(sentence, "", 80.0).is_none());
}

#[test]
fn test_best_sentence_ranked_by_indel_similarity() {
    // Both sentences align above 70; a substitution-counting metric would prefer the
    // second, indel similarity (82.35 vs 78.57) keeps the verbatim one.
    let quote = "crime fell sharply in london";
    let sentences = [
        "crime fell sharply in london, police say",
        "crime rose sharply in boston",
    ];
    assert!(find_quote_in_sentence(sentences[1], quote, 70.0).is_some());

    let best = get_best_matching_sentence_for_quote(quote, &sentences, 70.0).unwrap();
    assert_eq!(best.sentence_idx, 0);
    assert_eq!(as_tuple(&best.span), (0, 28, "crime fell sharply in london"));
    assert!((best.similarity - 1400.0 / 17.0).abs() < 1e-9);
}

#[test]
fn test_best_sentence_tie_goes_to_earliest() {
    let sentences = ["the vote is today", "the vote is today"];
    let best = get_best_matching_sentence_for_quote("the vote is today", &sentences, 80.0).unwrap();
    assert_eq!(best.sentence_idx, 0);
    assert_eq!(best.similarity, 100.0);
}

#[test]
fn test_get_best_matching_sentence_for_quote() {
    let cases: &[(&str, &str, &[&str], Option<usize>)] = &[
        (
            "simple example",
            "I will not seek reelection",
            &[
                "In a speech Biden indicated he would not run again.",
                "\"I will not seek reelection\", said the President to a room of journalists",
            ],
            Some(1),
        ),
        (
            "Tiny second sentence within quote.",
            "\"I think that we're stuck in that war unless I'm president. I'll get it done. I'll negotiate; I'll get us out. We gotta get out. Biden says, 'We will not leave until we win,'\" Trump argued.",
            &[
                "\"I think that we're stuck in that war unless I'm president. I'll get it done. I'll negotiate; I'll get us out. We gotta get out. Biden says, 'We will not leave until we win,'\"",
                "Trump argued.",
            ],
            Some(0),
        ),
        (
            "multiple sentences in claim",
            "'The information sharing with us was not adequate, it was worse than that, as it was basically non-existent. Everything I've since learned about what happened I've learned through the police, the trial and my solicitors.",
            &[
                "This is an added sentence before the useful ones",
                "'The information sharing with us was not adequate, it was worse than that, as it was basically non-existent.",
                "Everything I've since learned about what happened I've learned through the police, the trial and my solicitors.",
                "And a final one for good measure.",
            ],
            Some(2),
        ),
        (
            "Arabic example",
            "سرايا - أعلن ,اليوم الاربعاء, عن شواغر وظيفية, وكما دعت مؤسسات مرشحين للحضور لغاية المقابلة الشخصية استكمال اجراءات التعيين.",
            &[
                "سرايا - أعلن ,اليوم الاربعاء, عن شواغر وظيفية, وكما دعت مؤسسات مرشحين للحضور لغاية المقابلة الشخصية استكمال اجراءات التعيين.",
                "وتاليا التفاصيل والأسماء:",
            ],
            Some(0),
        ),
        (
            "Arabic harder example",
            "وأكدت جلالتها على ان \"للولايات المتحدة نفوذاً عسكرياً واقتصادياً ودبلوماسياً يمكنها استخدامه مع إسرائيل، وأن عليها البدء في استخدامه، \"لأن مخاطر التصعيد مرتفعة جداً الآن.\"",
            &[
                "وقالت حان الوقت ليتحرك المجتمع الدولي، مشيرة الى \"أن التعبير عن القلق أو حتى الدعوات إلى وقف إطلاق النار لا معنى لها طالما يتم الاستمرار في إمداد الأسلحة التي تقتل المدنيين\".",
                "وأكدت جلالتها على ان \"للولايات المتحدة نفوذاً عسكرياً واقتصادياً ودبلوماسياً يمكنها استخدامه مع إسرائيل، وأن عليها البدء في استخدامه،.\"",
                "\"لأن مخاطر التصعيد مرتفعة جداً الآن.\"وأشارت إلى ان السبب الجذري لهذا الصراع لم يبدأ في السابع من تشرين الأول، وبينت في نهاية المقابلة ان فشل محادثات السلام في الماضي كان بسبب عدم بذل أي جهد لتطبيق القانون الدولي ولعدم وضع كلف أو عواقب لردع الاحتلال، \"لذلك شعرت إسرائيل بالاستقواء وقامت ببناء المزيد من المستوطنات، والاستيلاء على المزيد من الأراضي\".",
            ],
            Some(1),
        ),
        (
            "French example",
            "Au Sénégal, son pays natal, on lui reconnait cet attribut au regard de son parcours à travers le profond hinterland du pays, avant et post indépendance, pour installer les bases du système éducatif alors embryonnaire, dans des conditions qu'il ne partageait alors qu'avec \" les médecins de campagne \".",
            &[
                "Au Sénégal, son pays natal, on lui reconnait cet attribut au regard de son parcours à travers le profond",
                "hinterland",
                "du pays, avant et post indépendance, pour installer les bases du système éducatif alors embryonnaire, dans des conditions qu'il ne partageait alors qu'avec \" les médecins de campagne \".",
            ],
            Some(2),
        ),
        (
            "No sentences matching claim",
            "Claim not in sentences",
            &[
                "Nothing to see here.",
                "Nowt here either.",
            ],
            None,
        ),
    ];
    for &(name, quote, sentences, expected) in cases {
        let best = get_best_matching_sentence_for_quote(quote, sentences, DEFAULT_LINK_THRESHOLD);
        assert_eq!(best.as_ref().map(|m| m.sentence_idx), expected, "case: {name}");
        if let Some(found) = best {
            assert!(found.span.end > found.span.start, "case: {name}");
            assert!((0.0..=100.0).contains(&found.similarity), "case: {name}");
        }
    }
}

type LinkCase<'a> = (
    &'a str,
    &'a [&'a str],
    &'a [&'a str],
    &'a [(usize, usize, (usize, usize, &'a str))],
);

#[test]
fn test_link_quotes_and_sentences() {
    let cases: &[LinkCase] = &[
        (
            "basic example",
            &[
                "he had seen mr smith in the shop",
                "denies all charges",
            ],
            &[
                "the witness said he had seen mr smith in the shop",
                "mr smith denies all charges",
            ],
            &[
                (0, 0, (17, 49, "he had seen mr smith in the shop")),
                (1, 1, (9, 27, "denies all charges")),
            ],
        ),
        (
            "Arabic example",
            &[
                "وقالت حان الوقت ليتحرك المجتمع الدولي،",
                " وقف إطلاق النار لا معنى لها طالما يتم الاستمرار في إمداد الأسلحة التي تقتل المدنيين",
                "وأكدت جلالتها على ان \"للولايات المتحدة نفوذاً عسكرياً واقتصادياً ودبلوماسياً يمكنها استخدامه مع إسرائيل، وأن عليها البدء في استخدامه، \"لأن مخاطر التصعيد مرتفعة جداً الآن.\"",
                "وقالت حان الوقت ليتحرك المجتمع الدولي،",
                "\"لذلك شعرت إسرائيل بالاستقواء وقامت ببناء المزيد من المستوطنات، والاستيلاء على المزيد من الأراضي\".",
                "ادعاء ليس له مكان هنا، لا يتطابق مع هذا",
            ],
            &[
                "وقالت حان الوقت ليتحرك المجتمع الدولي، مشيرة الى \"أن التعبير عن القلق أو حتى الدعوات إلى وقف إطلاق النار لا معنى لها طالما يتم الاستمرار في إمداد الأسلحة التي تقتل المدنيين\".",
                "وأكدت جلالتها على ان \"للولايات المتحدة نفوذاً عسكرياً واقتصادياً ودبلوماسياً يمكنها استخدامه مع إسرائيل، وأن عليها البدء في استخدامه،.\"",
                "\"لأن مخاطر التصعيد مرتفعة جداً الآن.\"",
                "وأشارت إلى ان السبب الجذري لهذا الصراع لم يبدأ في السابع من تشرين الأول، وبينت في نهاية المقابلة ان فشل محادثات السلام في الماضي كان بسبب عدم بذل أي جهد لتطبيق القانون الدولي ولعدم وضع كلف أو عواقب لردع الاحتلال، \"لذلك شعرت إسرائيل بالاستقواء وقامت ببناء المزيد من المستوطنات، والاستيلاء على المزيد من",
                " الأراضي\".",
                "جملة إضافية في النهاية ليس لها أي صلة.",
            ],
            &[
                (0, 0, (0, 38, "وقالت حان الوقت ليتحرك المجتمع الدولي،")),
                (1, 0, (88, 172, " وقف إطلاق النار لا معنى لها طالما يتم الاستمرار في إمداد الأسلحة التي تقتل المدنيين")),
                (2, 1, (0, 135, "وأكدت جلالتها على ان \"للولايات المتحدة نفوذاً عسكرياً واقتصادياً ودبلوماسياً يمكنها استخدامه مع إسرائيل، وأن عليها البدء في استخدامه،.\"")),
                (3, 0, (0, 38, "وقالت حان الوقت ليتحرك المجتمع الدولي،")),
                (4, 3, (213, 301, "\"لذلك شعرت إسرائيل بالاستقواء وقامت ببناء المزيد من المستوطنات، والاستيلاء على المزيد من")),
            ],
        ),
        (
            "French example",
            &[
                "conditions qu’il ne partageait alors qu’avec « les médecins de campagne »",
                "N'apparaît pas dans le texte.",
                "y compris lorsqu’il s’est agi pour lui de se mettre sous le drapeau de la France, pour aller combattre lors de la seconde guerre mondiale",
                "l’engagement militant pour son pays ne l’ont jamais quitté",
            ],
            &[
                "Au Sénégal, son pays natal, on lui reconnait cet attribut au regard de son parcours à travers le profond hinterland du pays, avant et post indépendance, pour installer les bases du système éducatif alors embryonnaire, dans des conditions qu’il ne partageait alors qu’avec « les médecins de campagne ».",
                "Cette vocation d’enseignant et de pédagogue hors pairs, et l’engagement militant pour son pays ne l’ont jamais quitté. Ainsi à tous les postes qu’il a eu à occuper le Président Amadou Mahtar Mbow a servi avec fierté et dévouement, y compris lorsqu’il s’est agi pour lui de se mettre sous le drapeau de la France, pour aller combattre lors de la seconde guerre mondiale, avec la ferme conviction de revenir servir son pays le Sénégal, dont il pensait qu’il en avait besoin.",
                "Avec le recul, on se rend compte aujourd’hui, qu’Amadou Mahtar Mbow nous a fait la preuve d’un altruisme extraordinaire qui a surpris plus d’un. ",
            ],
            &[
                (0, 0, (227, 300, "conditions qu’il ne partageait alors qu’avec « les médecins de campagne »")),
                (2, 1, (231, 368, "y compris lorsqu’il s’est agi pour lui de se mettre sous le drapeau de la France, pour aller combattre lors de la seconde guerre mondiale")),
                (3, 1, (59, 117, "l’engagement militant pour son pays ne l’ont jamais quitté")),
            ],
        ),
    ];
    for &(name, quotes, sentences, expected) in cases {
        let links = link_quotes_and_sentences(quotes, sentences, DEFAULT_LINK_THRESHOLD);
        let actual: Vec<(usize, usize, (usize, usize, &str))> = links
            .iter()
            .map(|l| (l.quote_idx, l.sentence_idx, as_tuple(&l.span)))
            .collect();
        assert_eq!(actual, expected.to_vec(), "case: {name}");
    }
}

#[test]
fn test_link_quotes_many_to_one() {
    let quotes = ["denies all charges", "mr smith denies", "unrelated words entirely"];
    let sentences = ["mr smith denies all charges"];
    let links = link_quotes_and_sentences(&quotes, &sentences, DEFAULT_LINK_THRESHOLD);
    assert_eq!(links.len(), 2);
    assert!(links.iter().all(|l| l.sentence_idx == 0));
    assert_eq!(links[1].quote_idx, 1);
}
