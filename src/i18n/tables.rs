// Static string tables. `EN` is the default table and must carry every key;
// the others may be partial and fall back to it.

pub(crate) const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("hi", "हिंदी"),
    ("gu", "ગુજરાતી"),
    ("mr", "मराठी"),
    ("te", "తెలుగు"),
    ("ta", "தமிழ்"),
];

pub(crate) fn table_for(code: &str) -> Option<&'static [(&'static str, &'static str)]> {
    match code {
        "en" => Some(EN),
        "hi" => Some(HI),
        "gu" => Some(GU),
        "mr" => Some(MR),
        "te" => Some(TE),
        "ta" => Some(TA),
        _ => None,
    }
}

pub(crate) const EN: &[(&str, &str)] = &[
    ("loading", "Loading..."),
    ("error", "Error"),
    ("success", "Success"),
    ("warning", "Warning"),
    ("info", "Information"),
    ("submit", "Submit"),
    ("cancel", "Cancel"),
    ("save", "Save"),
    ("search", "Search"),
    ("results", "Results"),
    ("recommendations", "Recommendations"),
    ("crop_type", "Crop Type"),
    ("season", "Season"),
    ("soil_type", "Soil Type"),
    ("kharif", "Kharif"),
    ("rabi", "Rabi"),
    ("live_prices", "Live Prices"),
    ("weather_shield", "Weather Shield"),
    ("yield_prediction", "Yield Prediction"),
    ("resources", "Resources"),
    ("required_field", "This field is required"),
    // uploads and camera
    ("upload.unsupported_type", "Please select a valid image file (JPG, PNG, GIF)"),
    ("upload.too_large", "File size too large. Please select an image under 16MB."),
    ("upload.selected", "Image selected successfully!"),
    ("upload.ready", "Ready to analyze: {name}"),
    ("upload.preview_failed", "Could not show a preview of this image."),
    ("camera.unavailable", "Camera access denied or not available"),
    // microphone
    ("mic.no_speech", "No speech was heard. Please try again."),
    ("mic.audio_capture", "Microphone problem. Please allow access."),
    ("mic.not_allowed", "Please allow microphone access."),
    ("mic.busy", "Already listening."),
    ("mic.generic", "Sorry, there was a problem understanding your voice."),
    // connectivity
    ("net.online", "Back online! All features are available."),
    ("net.offline", "You are offline. Some features may be limited."),
    // voice assistant
    ("voice.listening", "Listening..."),
    ("voice.speak_prompt", "Speak"),
    ("voice.you_asked", "You asked:"),
    ("voice.assistant_label", "AI farming expert:"),
    ("response.saved", "Response saved!"),
    ("fallback.prior_disease", "Your question seems to be about the earlier plant disease. Please tell me more clearly what you want to know."),
    ("fallback.disease", "For plant disease, spray neem oil (10 ml per litre). Send a photo and I can give better advice."),
    ("fallback.weather", "Plan farm work around the weather. Do not spray before rain. See the weather section for details."),
    ("fallback.price", "Market prices change daily. Check today's rates in the market section or contact your local mandi."),
    ("fallback.generic", "Please explain your question a little more. I can help with any farming problem."),
    ("speech.currency", "rupees"),
    ("speech.percent", "percent"),
    ("speech.celsius", "degrees Celsius"),
    // dashboard
    ("dashboard.load_failed", "Failed to load dashboard data"),
    ("dashboard.network_error", "Network error loading dashboard"),
    ("dashboard.your_location", "Your Location"),
    ("dashboard.market_title", "Market Prices"),
    ("dashboard.no_market_data", "No market data available"),
    ("dashboard.alerts_title", "Price Alerts"),
    ("dashboard.no_alerts", "No active alerts"),
    ("dashboard.alerts_unavailable", "Alerts are unavailable right now"),
    ("dashboard.insights_title", "Market Insights"),
    ("dashboard.no_insights", "No insights available"),
    ("dashboard.insights_unavailable", "Insights are unavailable right now"),
    // contextual voice hints
    ("hint.header", "You can ask:"),
    ("hint.results.0", "What is wrong with this plant?"),
    ("hint.results.1", "How often should the treatment be applied?"),
    ("hint.results.2", "How do I use neem oil?"),
    ("hint.market.0", "What are today's prices?"),
    ("hint.market.1", "When should I sell?"),
    ("hint.market.2", "How will prices move?"),
    ("hint.weather.0", "How is the weather today?"),
    ("hint.weather.1", "Will it rain?"),
    ("hint.weather.2", "Can I work in the field?"),
    ("hint.default.0", "Tell me about my crop problem"),
    ("hint.default.1", "How is the weather today?"),
    ("hint.default.2", "What are the market prices?"),
    // suggested follow-up questions
    ("follow_up.0", "Tell me more about this"),
    ("follow_up.1", "How long will it take?"),
    ("follow_up.2", "Is there another way?"),
    ("follow_up.3", "How much will it cost?"),
    ("follow_up.4", "When will it show effect?"),
];

pub(crate) const HI: &[(&str, &str)] = &[
    ("loading", "लोड हो रहा है..."),
    ("error", "त्रुटि"),
    ("success", "सफलता"),
    ("warning", "चेतावनी"),
    ("info", "जानकारी"),
    ("submit", "जमा करें"),
    ("cancel", "रद्द करें"),
    ("save", "सेव करें"),
    ("search", "खोजें"),
    ("results", "परिणाम"),
    ("recommendations", "सुझाव"),
    ("crop_type", "फसल का प्रकार"),
    ("season", "मौसम"),
    ("soil_type", "मिट्टी का प्रकार"),
    ("kharif", "खरीफ"),
    ("rabi", "रबी"),
    ("live_prices", "लाइव कीमतें"),
    ("weather_shield", "मौसम सुरक्षा"),
    ("yield_prediction", "उत्पादन पूर्वानुमान"),
    ("resources", "संसाधन"),
    ("required_field", "यह फ़ील्ड आवश्यक है"),
    ("upload.unsupported_type", "कृपया सही इमेज फ़ाइल चुनें (JPG, PNG, GIF)"),
    ("upload.too_large", "फ़ाइल बहुत बड़ी है। कृपया 16MB से छोटी इमेज चुनें।"),
    ("upload.selected", "इमेज चुन ली गई!"),
    ("upload.ready", "जांच के लिए तैयार: {name}"),
    ("upload.preview_failed", "इस इमेज का प्रीव्यू नहीं दिखा सके।"),
    ("camera.unavailable", "कैमरे की अनुमति नहीं मिली या कैमरा उपलब्ध नहीं है"),
    ("mic.no_speech", "कोई आवाज़ नहीं सुनाई दी। कृपया दोबारा कोशिश करें।"),
    ("mic.audio_capture", "माइक्रोफोन की समस्या। कृपया अनुमति दें।"),
    ("mic.not_allowed", "माइक्रोफोन की अनुमति दें।"),
    ("mic.busy", "पहले से सुन रहा हूँ।"),
    ("mic.generic", "माफ करें, आवाज़ समझने में समस्या हुई।"),
    ("net.online", "फिर से ऑनलाइन! सभी सुविधाएं उपलब्ध हैं।"),
    ("net.offline", "आप ऑफ़लाइन हैं। कुछ सुविधाएं सीमित हो सकती हैं।"),
    ("voice.listening", "सुन रहा हूँ..."),
    ("voice.speak_prompt", "बोलिए"),
    ("voice.you_asked", "आपने पूछा:"),
    ("voice.assistant_label", "AI कृषि विशेषज्ञ:"),
    ("response.saved", "जवाब सेव हो गया!"),
    ("fallback.prior_disease", "आपका सवाल पिछली बीमारी के बारे में है। कृपया अधिक स्पष्ट करें कि आप क्या जानना चाहते हैं।"),
    ("fallback.disease", "पौधे की बीमारी के लिए नीम का तेल (10 मिली प्रति लीटर) का छिड़काव करें। फोटो भेजें तो बेहतर सलाह दे सकूंगा।"),
    ("fallback.weather", "मौसम के अनुसार खेती करें। बारिश से पहले छिड़काव न करें। मौसम सेक्शन में विस्तृत जानकारी देखें।"),
    ("fallback.price", "बाजार की कीमतें रोज बदलती हैं। मार्केट सेक्शन में आज के भाव देखें या स्थानीय मंडी से संपर्क करें।"),
    ("fallback.generic", "कृपया अपना सवाल और स्पष्ट करें। मैं आपकी खेती से जुड़ी हर समस्या में मदद कर सकता हूं।"),
    ("speech.currency", "रुपए"),
    ("speech.percent", "प्रतिशत"),
    ("speech.celsius", "डिग्री सेल्सियस"),
    ("dashboard.load_failed", "डैशबोर्ड डेटा लोड नहीं हो सका"),
    ("dashboard.network_error", "डैशबोर्ड लोड करते समय नेटवर्क त्रुटि"),
    ("dashboard.your_location", "आपका स्थान"),
    ("dashboard.market_title", "बाजार भाव"),
    ("dashboard.no_market_data", "बाजार डेटा उपलब्ध नहीं है"),
    ("dashboard.alerts_title", "मूल्य अलर्ट"),
    ("dashboard.no_alerts", "कोई सक्रिय अलर्ट नहीं"),
    ("dashboard.alerts_unavailable", "अभी अलर्ट उपलब्ध नहीं हैं"),
    ("dashboard.insights_title", "बाजार जानकारी"),
    ("dashboard.no_insights", "कोई जानकारी उपलब्ध नहीं"),
    ("dashboard.insights_unavailable", "अभी जानकारी उपलब्ध नहीं है"),
    ("hint.header", "आप यह पूछ सकते हैं:"),
    ("hint.results.0", "इस पौधे की क्या समस्या है?"),
    ("hint.results.1", "इलाज कितनी बार करना है?"),
    ("hint.results.2", "नीम का तेल कैसे इस्तेमाल करें?"),
    ("hint.market.0", "आज के भाव क्या हैं?"),
    ("hint.market.1", "कब बेचना चाहिए?"),
    ("hint.market.2", "कीमत कैसी रहेगी?"),
    ("hint.weather.0", "आज मौसम कैसा है?"),
    ("hint.weather.1", "बारिश होगी क्या?"),
    ("hint.weather.2", "खेत में काम कर सकते हैं?"),
    ("hint.default.0", "मेरी फसल की समस्या बताएं"),
    ("hint.default.1", "आज का मौसम कैसा है?"),
    ("hint.default.2", "बाजार के भाव क्या हैं?"),
    ("follow_up.0", "इसके बारे में और बताएं"),
    ("follow_up.1", "कितना समय लगेगा?"),
    ("follow_up.2", "कोई और तरीका है?"),
    ("follow_up.3", "लागत कितनी आएगी?"),
    ("follow_up.4", "कब तक असर दिखेगा?"),
];

pub(crate) const GU: &[(&str, &str)] = &[
    ("loading", "લોડ થઈ રહ્યું છે..."),
    ("error", "ભૂલ"),
    ("success", "સફળતા"),
    ("warning", "ચેતવણી"),
    ("info", "માહિતી"),
    ("submit", "સબમિટ કરો"),
    ("cancel", "રદ કરો"),
    ("save", "સેવ કરો"),
    ("search", "શોધો"),
    ("results", "પરિણામો"),
    ("recommendations", "સુઝાવો"),
    ("crop_type", "પાકનો પ્રકાર"),
    ("season", "મોસમ"),
    ("soil_type", "માટીનો પ્રકાર"),
    ("kharif", "ખરીફ"),
    ("rabi", "રબી"),
    ("live_prices", "લાઇવ કિંમતો"),
    ("weather_shield", "હવામાન સુરક્ષા"),
    ("yield_prediction", "ઉત્પાદન આગાહી"),
    ("resources", "સંસાધનો"),
    ("speech.currency", "રૂપિયા"),
    ("speech.percent", "ટકા"),
    ("speech.celsius", "ડિગ્રી સેલ્સિયસ"),
];

pub(crate) const MR: &[(&str, &str)] = &[
    ("loading", "लोड होत आहे..."),
    ("error", "त्रुटी"),
    ("success", "यश"),
    ("warning", "चेतावणी"),
    ("info", "माहिती"),
    ("submit", "सबमिट करा"),
    ("cancel", "रद्द करा"),
    ("save", "सेव्ह करा"),
    ("results", "परिणाम"),
    ("recommendations", "शिफारसी"),
    ("crop_type", "पिकाचा प्रकार"),
    ("season", "हंगाम"),
    ("soil_type", "मातीचा प्रकार"),
    ("kharif", "खरीप"),
    ("rabi", "रब्बी"),
    ("speech.currency", "रुपये"),
    ("speech.percent", "टक्के"),
    ("speech.celsius", "अंश सेल्सिअस"),
];

pub(crate) const TE: &[(&str, &str)] = &[
    ("loading", "లోడ్ అవుతోంది..."),
    ("error", "లోపం"),
    ("success", "విజయం"),
    ("warning", "హెచ్చరిక"),
    ("info", "సమాచారం"),
    ("submit", "సమర్పించండి"),
    ("cancel", "రద్దు చేయండి"),
    ("save", "సేవ్ చేయండి"),
    ("results", "ఫలితాలు"),
    ("recommendations", "సలహాలు"),
    ("crop_type", "పంట రకం"),
    ("season", "సీజన్"),
    ("soil_type", "మిట్టి రకం"),
    ("kharif", "ఖరీఫ్"),
    ("rabi", "రబీ"),
    ("speech.currency", "రూపాయలు"),
    ("speech.percent", "శాతం"),
    ("speech.celsius", "డిగ్రీల సెల్సియస్"),
];

pub(crate) const TA: &[(&str, &str)] = &[
    ("loading", "ஏறுகிறது..."),
    ("error", "பிழை"),
    ("success", "வெற்றி"),
    ("warning", "எச்சரிக்கை"),
    ("info", "தகவல்"),
    ("submit", "சமர்ப்பிக்கவும்"),
    ("cancel", "ரத்து செய்யவும்"),
    ("save", "சேமிக்கவும்"),
    ("results", "முடிவுகள்"),
    ("recommendations", "பரிந்துரைகள்"),
    ("crop_type", "பயிர் வகை"),
    ("season", "பருவம்"),
    ("soil_type", "மண் வகை"),
    ("kharif", "கரீப்"),
    ("rabi", "ரபி"),
    ("speech.currency", "ரூபாய்"),
    ("speech.percent", "சதவீதம்"),
    ("speech.celsius", "டிகிரி செல்சியஸ்"),
];
